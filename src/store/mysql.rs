use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::{debug, error};

use super::{AttendanceStore, EmployeeStore, JsonRow, UserStore};
use crate::error::AppError;
use crate::model::attendance::{Attendance, AttendanceFilter, AttendancePatch, RosterEntry};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::model::user::{NewUser, User, UserPatch};
use crate::query::{ListQuery, Paginated};
use crate::utils::db_utils::{SqlValue, build_update_sql, execute_update, row_to_json, to_arguments};

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl EmployeeStore for MySqlStore {
    async fn create_employee(&self, new: NewEmployee) -> Result<Employee, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (name, age, designation, hiring_date, date_of_birth, salary, photo_path)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.name)
        .bind(new.age)
        .bind(new.designation)
        .bind(new.hiring_date)
        .bind(new.date_of_birth)
        .bind(new.salary)
        .bind(new.photo_path)
        .execute(&self.pool)
        .await?;

        self.find_employee(result.last_insert_id())
            .await?
            .ok_or_else(|| AppError::internal("Inserted employee could not be read back"))
    }

    async fn find_employee(&self, id: u64) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn all_employees(&self) -> Result<Vec<Employee>, AppError> {
        let employees =
            sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(employees)
    }

    async fn list_employees(&self, query: &ListQuery) -> Result<Paginated<JsonRow>, AppError> {
        // ---------- total count ----------
        let count = query.to_count_sql("employees");
        debug!(sql = %count.sql, bindings = ?count.values, "Counting employees");

        let total = sqlx::query_scalar_with::<_, i64, _>(&count.sql, to_arguments(count.values))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, sql = %count.sql, "Failed to count employees");
                AppError::from(e)
            })?;

        // ---------- data query ----------
        let data = query.to_select_sql("employees");
        debug!(sql = %data.sql, bindings = ?data.values, "Fetching employees");

        let rows = sqlx::query_with(&data.sql, to_arguments(data.values))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, sql = %data.sql, "Failed to fetch employees");
                AppError::from(e)
            })?;

        let data = rows.iter().map(row_to_json).collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            data,
            meta: query.meta(total.max(0) as u64),
        })
    }

    async fn employees_by_designation(&self, designation: &str) -> Result<Vec<Employee>, AppError> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE designation = ? ORDER BY created_at DESC",
        )
        .bind(designation)
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    async fn search_employees(&self, term: &str) -> Result<Vec<Employee>, AppError> {
        let pattern = format!("%{}%", term.to_lowercase());
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
            WHERE LOWER(name) LIKE ? OR LOWER(designation) LIKE ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    async fn update_employee(&self, id: u64, patch: EmployeePatch) -> Result<(), AppError> {
        let mut assignments = Vec::new();
        if let Some(name) = patch.name {
            assignments.push(("name", SqlValue::String(name)));
        }
        if let Some(age) = patch.age {
            assignments.push(("age", SqlValue::U64(age.into())));
        }
        if let Some(designation) = patch.designation {
            assignments.push(("designation", SqlValue::String(designation)));
        }
        if let Some(hiring_date) = patch.hiring_date {
            assignments.push(("hiring_date", SqlValue::Date(hiring_date)));
        }
        if let Some(date_of_birth) = patch.date_of_birth {
            assignments.push(("date_of_birth", SqlValue::Date(date_of_birth)));
        }
        if let Some(salary) = patch.salary {
            assignments.push(("salary", SqlValue::Decimal(salary)));
        }
        if let Some(photo_path) = patch.photo_path {
            assignments.push(("photo_path", SqlValue::String(photo_path)));
        }

        let update = build_update_sql("employees", assignments, "id", id)?;
        execute_update(&self.pool, update).await?;
        Ok(())
    }

    async fn delete_employee(&self, id: u64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

impl AttendanceStore for MySqlStore {
    async fn upsert_attendance(
        &self,
        employee_id: u64,
        date: NaiveDate,
        check_in_time: &str,
    ) -> Result<Attendance, AppError> {
        // uq_attendance_employee_date turns a racing second insert into an update.
        sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, check_in_time)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE
                check_in_time = VALUES(check_in_time),
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .bind(check_in_time)
        .execute(&self.pool)
        .await?;

        let record = sqlx::query_as::<_, Attendance>(
            "SELECT * FROM attendance WHERE employee_id = ? AND date = ?",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn find_attendance(&self, id: u64) -> Result<Option<Attendance>, AppError> {
        let record = sqlx::query_as::<_, Attendance>("SELECT * FROM attendance WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn attendance_for_employee(&self, employee_id: u64) -> Result<Vec<Attendance>, AppError> {
        let records = sqlx::query_as::<_, Attendance>(
            "SELECT * FROM attendance WHERE employee_id = ? ORDER BY date DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn attendance_on(&self, date: NaiveDate) -> Result<Vec<Attendance>, AppError> {
        let records = sqlx::query_as::<_, Attendance>(
            "SELECT * FROM attendance WHERE date = ? ORDER BY check_in_time ASC",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn attendance_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Attendance>, AppError> {
        let records = sqlx::query_as::<_, Attendance>(
            "SELECT * FROM attendance WHERE date BETWEEN ? AND ? ORDER BY date DESC",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<Attendance>, AppError> {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        if let Some(employee_id) = filter.employee_id {
            conditions.push("employee_id = ?");
            values.push(SqlValue::U64(employee_id));
        }
        if let Some(date) = filter.date {
            conditions.push("date = ?");
            values.push(SqlValue::Date(date));
        }
        match (filter.from, filter.to) {
            (Some(from), Some(to)) => {
                conditions.push("date BETWEEN ? AND ?");
                values.push(SqlValue::Date(from));
                values.push(SqlValue::Date(to));
            }
            (Some(from), None) => {
                conditions.push("date >= ?");
                values.push(SqlValue::Date(from));
            }
            (None, Some(to)) => {
                conditions.push("date <= ?");
                values.push(SqlValue::Date(to));
            }
            (None, None) => {}
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT * FROM attendance{} ORDER BY date DESC, check_in_time ASC",
            where_clause
        );
        debug!(sql = %sql, bindings = ?values, "Listing attendance");

        let records = sqlx::query_as_with::<_, Attendance, _>(&sql, to_arguments(values))
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn roster_for_day(&self, date: NaiveDate) -> Result<Vec<RosterEntry>, AppError> {
        let entries = sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT
                e.id AS employee_id,
                e.name,
                a.id AS attendance_id,
                a.date,
                a.check_in_time,
                a.created_at,
                a.updated_at
            FROM employees e
            LEFT JOIN attendance a
                ON a.employee_id = e.id
                AND a.date = ?
            ORDER BY e.id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn update_attendance(&self, id: u64, patch: AttendancePatch) -> Result<(), AppError> {
        let mut assignments = Vec::new();
        if let Some(employee_id) = patch.employee_id {
            assignments.push(("employee_id", SqlValue::U64(employee_id)));
        }
        if let Some(date) = patch.date {
            assignments.push(("date", SqlValue::Date(date)));
        }
        if let Some(check_in_time) = patch.check_in_time {
            assignments.push(("check_in_time", SqlValue::String(check_in_time)));
        }

        let update = build_update_sql("attendance", assignments, "id", id)?;
        execute_update(&self.pool, update).await?;
        Ok(())
    }

    async fn delete_attendance(&self, id: u64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

impl UserStore for MySqlStore {
    async fn create_user(&self, new: NewUser) -> Result<User, AppError> {
        let result = sqlx::query(
            r#"INSERT INTO hr_users (email, password_hash, name) VALUES (?, ?, ?)"#,
        )
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.name)
        .execute(&self.pool)
        .await?;

        self.find_user(result.last_insert_id())
            .await?
            .ok_or_else(|| AppError::internal("Inserted user could not be read back"))
    }

    async fn find_user(&self, id: u64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM hr_users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM hr_users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn all_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM hr_users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn update_user(&self, id: u64, patch: UserPatch) -> Result<(), AppError> {
        let mut assignments = Vec::new();
        if let Some(email) = patch.email {
            assignments.push(("email", SqlValue::String(email)));
        }
        if let Some(password_hash) = patch.password_hash {
            assignments.push(("password_hash", SqlValue::String(password_hash)));
        }
        if let Some(name) = patch.name {
            assignments.push(("name", SqlValue::String(name)));
        }

        let update = build_update_sql("hr_users", assignments, "id", id)?;
        execute_update(&self.pool, update).await?;
        Ok(())
    }

    async fn delete_user(&self, id: u64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM hr_users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
