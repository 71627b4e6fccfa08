//! In-process store for tests. Mirrors the MySQL schema rules that matter to
//! callers: unique (employee_id, date), unique email, attendance FK with
//! cascade on employee delete.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use super::{AttendanceStore, EmployeeStore, JsonRow, UserStore};
use crate::error::AppError;
use crate::model::attendance::{Attendance, AttendanceFilter, AttendancePatch, RosterEntry};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::model::user::{NewUser, User, UserPatch};
use crate::query::{CompareOp, Filter, FilterValue, ListQuery, Paginated, SortDirection};

#[derive(Default)]
struct Tables {
    next_id: u64,
    ticks: i64,
    employees: BTreeMap<u64, Employee>,
    attendance: BTreeMap<u64, Attendance>,
    users: BTreeMap<u64, User>,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing timestamps so "newest first" is deterministic.
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(self.ticks)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Raw count of attendance rows for a pair, bypassing the trait.
    pub fn attendance_rows_for(&self, employee_id: u64, date: NaiveDate) -> usize {
        self.lock()
            .attendance
            .values()
            .filter(|a| a.employee_id == employee_id && a.date == date)
            .count()
    }
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare(value: &Value, other: &FilterValue) -> Option<Ordering> {
    if value.is_null() {
        return None;
    }
    let rhs_number = match other {
        FilterValue::Number(n) => Some(*n),
        FilterValue::Text(t) => t.trim().parse::<f64>().ok(),
    };
    match (value.as_f64(), rhs_number) {
        (Some(lhs), Some(rhs)) => lhs.partial_cmp(&rhs),
        _ => {
            let rhs = match other {
                FilterValue::Number(n) => n.to_string(),
                FilterValue::Text(t) => t.clone(),
            };
            Some(json_text(value).cmp(&rhs))
        }
    }
}

fn matches(row: &JsonRow, filter: &Filter) -> bool {
    let field = |name: &str| row.get(name).cloned().unwrap_or(Value::Null);
    match filter {
        Filter::Equals { field: name, value } => {
            compare(&field(name), &FilterValue::Text(value.clone())) == Some(Ordering::Equal)
        }
        Filter::In { field: name, values } => values.iter().any(|v| {
            compare(&field(name), &FilterValue::Text(v.clone())) == Some(Ordering::Equal)
        }),
        Filter::Compare { field: name, op, value } => match compare(&field(name), value) {
            None => false,
            Some(ord) => match op {
                CompareOp::Gt => ord == Ordering::Greater,
                CompareOp::Gte => ord != Ordering::Less,
                CompareOp::Lt => ord == Ordering::Less,
                CompareOp::Lte => ord != Ordering::Greater,
                CompareOp::Ne => ord != Ordering::Equal,
            },
        },
        Filter::Search { fields, term } => {
            let term = term.to_lowercase();
            fields.iter().any(|name| {
                let value = field(name);
                !value.is_null() && json_text(&value).to_lowercase().contains(&term)
            })
        }
    }
}

fn order_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => json_text(a).cmp(&json_text(b)),
        },
    }
}

fn to_row(employee: &Employee) -> JsonRow {
    match serde_json::to_value(employee) {
        Ok(Value::Object(map)) => map,
        _ => JsonRow::new(),
    }
}

fn sort_attendance(records: &mut [Attendance]) {
    records.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.check_in_time.cmp(&b.check_in_time))
    });
}

impl EmployeeStore for MemoryStore {
    async fn create_employee(&self, new: NewEmployee) -> Result<Employee, AppError> {
        let mut tables = self.lock();
        let id = tables.next_id();
        let now = tables.now();
        let employee = Employee {
            id,
            name: new.name,
            age: new.age,
            designation: new.designation,
            hiring_date: new.hiring_date,
            date_of_birth: new.date_of_birth,
            salary: new.salary,
            photo_path: new.photo_path,
            created_at: now,
            updated_at: now,
        };
        tables.employees.insert(id, employee.clone());
        Ok(employee)
    }

    async fn find_employee(&self, id: u64) -> Result<Option<Employee>, AppError> {
        Ok(self.lock().employees.get(&id).cloned())
    }

    async fn all_employees(&self) -> Result<Vec<Employee>, AppError> {
        let mut all: Vec<Employee> = self.lock().employees.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn list_employees(&self, query: &ListQuery) -> Result<Paginated<JsonRow>, AppError> {
        let rows: Vec<JsonRow> = self.lock().employees.values().map(to_row).collect();

        let mut matched: Vec<JsonRow> = rows
            .into_iter()
            .filter(|row| query.filters.iter().all(|f| matches(row, f)))
            .collect();
        let total = matched.len() as u64;

        matched.sort_by(|a, b| {
            query.sort.iter().fold(Ordering::Equal, |acc, key| {
                acc.then_with(|| {
                    let lhs = a.get(&key.field).unwrap_or(&Value::Null);
                    let rhs = b.get(&key.field).unwrap_or(&Value::Null);
                    match key.direction {
                        SortDirection::Asc => order_values(lhs, rhs),
                        SortDirection::Desc => order_values(rhs, lhs),
                    }
                })
            })
        });

        let data = matched
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .map(|row| match &query.fields {
                Some(cols) => row
                    .into_iter()
                    .filter(|(k, _)| cols.contains(k))
                    .collect(),
                None => row,
            })
            .collect();

        Ok(Paginated {
            data,
            meta: query.meta(total),
        })
    }

    async fn employees_by_designation(&self, designation: &str) -> Result<Vec<Employee>, AppError> {
        let mut found: Vec<Employee> = self
            .lock()
            .employees
            .values()
            .filter(|e| e.designation == designation)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn search_employees(&self, term: &str) -> Result<Vec<Employee>, AppError> {
        let term = term.to_lowercase();
        let mut found: Vec<Employee> = self
            .lock()
            .employees
            .values()
            .filter(|e| {
                e.name.to_lowercase().contains(&term) || e.designation.to_lowercase().contains(&term)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn update_employee(&self, id: u64, patch: EmployeePatch) -> Result<(), AppError> {
        if patch.is_empty() {
            return Err(AppError::invalid("No fields provided for update"));
        }
        let mut tables = self.lock();
        let now = tables.now();
        if let Some(employee) = tables.employees.get_mut(&id) {
            if let Some(v) = patch.name {
                employee.name = v;
            }
            if let Some(v) = patch.age {
                employee.age = v;
            }
            if let Some(v) = patch.designation {
                employee.designation = v;
            }
            if let Some(v) = patch.hiring_date {
                employee.hiring_date = v;
            }
            if let Some(v) = patch.date_of_birth {
                employee.date_of_birth = v;
            }
            if let Some(v) = patch.salary {
                employee.salary = v;
            }
            if let Some(v) = patch.photo_path {
                employee.photo_path = Some(v);
            }
            employee.updated_at = now;
        }
        Ok(())
    }

    async fn delete_employee(&self, id: u64) -> Result<u64, AppError> {
        let mut tables = self.lock();
        let removed = tables.employees.remove(&id).is_some();
        if removed {
            tables.attendance.retain(|_, a| a.employee_id != id);
        }
        Ok(removed as u64)
    }
}

impl AttendanceStore for MemoryStore {
    async fn upsert_attendance(
        &self,
        employee_id: u64,
        date: NaiveDate,
        check_in_time: &str,
    ) -> Result<Attendance, AppError> {
        let mut tables = self.lock();
        if !tables.employees.contains_key(&employee_id) {
            return Err(AppError::invalid("Foreign key constraint fails."));
        }
        let now = tables.now();

        if let Some(existing) = tables
            .attendance
            .values_mut()
            .find(|a| a.employee_id == employee_id && a.date == date)
        {
            existing.check_in_time = check_in_time.to_string();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let id = tables.next_id();
        let record = Attendance {
            id,
            employee_id,
            date,
            check_in_time: check_in_time.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.attendance.insert(id, record.clone());
        Ok(record)
    }

    async fn find_attendance(&self, id: u64) -> Result<Option<Attendance>, AppError> {
        Ok(self.lock().attendance.get(&id).cloned())
    }

    async fn attendance_for_employee(&self, employee_id: u64) -> Result<Vec<Attendance>, AppError> {
        let mut records: Vec<Attendance> = self
            .lock()
            .attendance
            .values()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn attendance_on(&self, date: NaiveDate) -> Result<Vec<Attendance>, AppError> {
        let mut records: Vec<Attendance> = self
            .lock()
            .attendance
            .values()
            .filter(|a| a.date == date)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.check_in_time.cmp(&b.check_in_time));
        Ok(records)
    }

    async fn attendance_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Attendance>, AppError> {
        let mut records: Vec<Attendance> = self
            .lock()
            .attendance
            .values()
            .filter(|a| a.date >= from && a.date <= to)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<Attendance>, AppError> {
        let mut records: Vec<Attendance> = self
            .lock()
            .attendance
            .values()
            .filter(|a| filter.employee_id.is_none_or(|id| a.employee_id == id))
            .filter(|a| filter.date.is_none_or(|d| a.date == d))
            .filter(|a| filter.from.is_none_or(|d| a.date >= d))
            .filter(|a| filter.to.is_none_or(|d| a.date <= d))
            .cloned()
            .collect();
        sort_attendance(&mut records);
        Ok(records)
    }

    async fn roster_for_day(&self, date: NaiveDate) -> Result<Vec<RosterEntry>, AppError> {
        let tables = self.lock();
        let roster = tables
            .employees
            .values()
            .map(|e| {
                let record = tables
                    .attendance
                    .values()
                    .find(|a| a.employee_id == e.id && a.date == date);
                RosterEntry {
                    employee_id: e.id,
                    name: e.name.clone(),
                    attendance_id: record.map(|a| a.id),
                    date: record.map(|a| a.date),
                    check_in_time: record.map(|a| a.check_in_time.clone()),
                    created_at: record.map(|a| a.created_at),
                    updated_at: record.map(|a| a.updated_at),
                }
            })
            .collect();
        Ok(roster)
    }

    async fn update_attendance(&self, id: u64, patch: AttendancePatch) -> Result<(), AppError> {
        let mut tables = self.lock();
        let Some(current) = tables.attendance.get(&id).cloned() else {
            return Ok(());
        };

        let employee_id = patch.employee_id.unwrap_or(current.employee_id);
        let date = patch.date.unwrap_or(current.date);
        if !tables.employees.contains_key(&employee_id) {
            return Err(AppError::invalid("Foreign key constraint fails."));
        }
        let clash = tables
            .attendance
            .values()
            .any(|a| a.id != id && a.employee_id == employee_id && a.date == date);
        if clash {
            return Err(AppError::conflict(
                "Duplicate field value. Please use another value.",
            ));
        }

        let now = tables.now();
        if let Some(record) = tables.attendance.get_mut(&id) {
            record.employee_id = employee_id;
            record.date = date;
            if let Some(time) = patch.check_in_time {
                record.check_in_time = time;
            }
            record.updated_at = now;
        }
        Ok(())
    }

    async fn delete_attendance(&self, id: u64) -> Result<u64, AppError> {
        Ok(self.lock().attendance.remove(&id).is_some() as u64)
    }
}

impl UserStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User, AppError> {
        let mut tables = self.lock();
        if tables.users.values().any(|u| u.email == new.email) {
            return Err(AppError::conflict(
                "Duplicate field value. Please use another value.",
            ));
        }
        let id = tables.next_id();
        let now = tables.now();
        let user = User {
            id,
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: u64) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.values().find(|u| u.email == email).cloned())
    }

    async fn all_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.lock().users.values().cloned().collect())
    }

    async fn update_user(&self, id: u64, patch: UserPatch) -> Result<(), AppError> {
        let mut tables = self.lock();
        if let Some(email) = &patch.email {
            if tables.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::conflict(
                    "Duplicate field value. Please use another value.",
                ));
            }
        }
        let now = tables.now();
        if let Some(user) = tables.users.get_mut(&id) {
            if let Some(v) = patch.email {
                user.email = v;
            }
            if let Some(v) = patch.password_hash {
                user.password_hash = v;
            }
            if let Some(v) = patch.name {
                user.name = v;
            }
            user.updated_at = now;
        }
        Ok(())
    }

    async fn delete_user(&self, id: u64) -> Result<u64, AppError> {
        Ok(self.lock().users.remove(&id).is_some() as u64)
    }
}
