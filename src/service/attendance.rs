use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::error::AppError;
use crate::model::attendance::{
    Attendance, AttendanceFilter, AttendanceListRow, AttendancePatch, AttendanceStatus, RosterEntry,
};
use crate::store::{AttendanceStore, EmployeeStore};
use crate::utils::dates::{is_truthy, normalize_check_in_time, parse_day};

/// Raw check-in as received; date and time are validated here.
#[derive(Debug, Clone)]
pub struct CheckIn {
    pub employee_id: u64,
    pub date: String,
    pub check_in_time: String,
}

#[derive(Debug, Clone, Default)]
pub struct AttendanceChanges {
    pub employee_id: Option<u64>,
    pub date: Option<String>,
    pub check_in_time: Option<String>,
}

/// Query parameters of the attendance list endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Requires both `from` and `to`
    pub employee_id: Option<String>,
    #[param(example = "2025-08-12")]
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// With `date` alone: every employee, marked present or absent
    pub include_absent: Option<String>,
}

/// How a list request will be served.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    Filtered(AttendanceFilter),
    Roster(NaiveDate),
}

fn invalid_date() -> AppError {
    AppError::invalid("Invalid date provided")
}

fn invalid_time() -> AppError {
    AppError::invalid("Invalid time format. Use HH:MM format")
}

fn check_employee_id(employee_id: u64) -> Result<(), AppError> {
    if employee_id == 0 {
        return Err(AppError::invalid("Employee ID must be a positive number"));
    }
    Ok(())
}

async fn ensure_employee<S: EmployeeStore>(store: &S, employee_id: u64) -> Result<(), AppError> {
    match store.find_employee(employee_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found("Employee not found")),
    }
}

/// Records a check-in, replacing the time if the employee already has a row
/// for that day.
pub async fn record_check_in<S>(store: &S, input: CheckIn) -> Result<Attendance, AppError>
where
    S: AttendanceStore + EmployeeStore,
{
    check_employee_id(input.employee_id)?;
    let date = parse_day(&input.date).ok_or_else(invalid_date)?;
    let time = normalize_check_in_time(&input.check_in_time).ok_or_else(invalid_time)?;

    ensure_employee(store, input.employee_id).await?;

    let record = store.upsert_attendance(input.employee_id, date, &time).await?;
    info!(
        attendance_id = record.id,
        employee_id = record.employee_id,
        %date,
        check_in_time = %record.check_in_time,
        "Attendance recorded"
    );
    Ok(record)
}

pub async fn get_attendance<S: AttendanceStore>(store: &S, id: u64) -> Result<Attendance, AppError> {
    store
        .find_attendance(id)
        .await?
        .ok_or_else(|| AppError::not_found("Attendance record not found"))
}

pub async fn update_attendance<S>(
    store: &S,
    id: u64,
    changes: AttendanceChanges,
) -> Result<Attendance, AppError>
where
    S: AttendanceStore + EmployeeStore,
{
    if changes.employee_id.is_none() && changes.date.is_none() && changes.check_in_time.is_none() {
        return Err(AppError::invalid("At least one field is required"));
    }
    if let Some(employee_id) = changes.employee_id {
        check_employee_id(employee_id)?;
    }
    let date = changes
        .date
        .as_deref()
        .map(|raw| parse_day(raw).ok_or_else(invalid_date))
        .transpose()?;
    let check_in_time = changes
        .check_in_time
        .as_deref()
        .map(|raw| normalize_check_in_time(raw).ok_or_else(invalid_time))
        .transpose()?;

    let current = get_attendance(store, id).await?;
    if let Some(employee_id) = changes.employee_id {
        if employee_id != current.employee_id {
            ensure_employee(store, employee_id).await?;
        }
    }

    store
        .update_attendance(
            id,
            AttendancePatch {
                employee_id: changes.employee_id,
                date,
                check_in_time,
            },
        )
        .await?;
    info!(attendance_id = id, "Attendance updated");
    get_attendance(store, id).await
}

pub async fn delete_attendance<S: AttendanceStore>(store: &S, id: u64) -> Result<(), AppError> {
    if store.delete_attendance(id).await? == 0 {
        return Err(AppError::not_found("Attendance record not found"));
    }
    info!(attendance_id = id, "Attendance deleted");
    Ok(())
}

pub async fn attendance_for_employee<S>(store: &S, employee_id: u64) -> Result<Vec<Attendance>, AppError>
where
    S: AttendanceStore + EmployeeStore,
{
    ensure_employee(store, employee_id).await?;
    store.attendance_for_employee(employee_id).await
}

pub async fn attendance_on<S: AttendanceStore>(store: &S, date: &str) -> Result<Vec<Attendance>, AppError> {
    if date.trim().is_empty() {
        return Err(AppError::invalid("Date is required"));
    }
    let date = parse_day(date).ok_or_else(invalid_date)?;
    store.attendance_on(date).await
}

pub async fn attendance_between<S: AttendanceStore>(
    store: &S,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Vec<Attendance>, AppError> {
    let (Some(start), Some(end)) = (
        start.filter(|s| !s.trim().is_empty()),
        end.filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(AppError::invalid("Start date and end date are required"));
    };
    let start = parse_day(start).ok_or_else(invalid_date)?;
    let end = parse_day(end).ok_or_else(invalid_date)?;
    store.attendance_between(start, end).await
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn optional_day(key: &str, value: &Option<String>) -> Result<Option<NaiveDate>, AppError> {
    match present(value) {
        Some(raw) => parse_day(raw)
            .map(Some)
            .ok_or_else(|| AppError::invalid(format!("{key} must be a valid date"))),
        None => Ok(None),
    }
}

/// Validates list parameters and decides between a filtered listing and a
/// full-roster view of one day.
pub fn resolve_listing(query: &AttendanceQuery) -> Result<Listing, AppError> {
    let employee_id = match present(&query.employee_id) {
        Some(raw) => Some(
            raw.parse::<u64>()
                .map_err(|_| AppError::invalid("employee_id must be a number"))?,
        ),
        None => None,
    };

    if employee_id.is_some() && (present(&query.from).is_none() || present(&query.to).is_none()) {
        return Err(AppError::invalid(
            "When filtering by employee_id, both from and to dates are required",
        ));
    }

    let date = optional_day("date", &query.date)?;
    let from = optional_day("from", &query.from)?;
    let to = optional_day("to", &query.to)?;
    let include_absent = present(&query.include_absent).is_some_and(is_truthy);

    match date {
        Some(day) if include_absent && employee_id.is_none() && from.is_none() && to.is_none() => {
            Ok(Listing::Roster(day))
        }
        _ => Ok(Listing::Filtered(AttendanceFilter {
            employee_id,
            date,
            from,
            to,
        })),
    }
}

/// Marks each roster entry present or absent. Absent rows carry the
/// requested day and no check-in.
pub fn roster_rows(day: NaiveDate, roster: Vec<RosterEntry>) -> Vec<AttendanceListRow> {
    roster
        .into_iter()
        .map(|entry| {
            let status = if entry.attendance_id.is_some() {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            };
            AttendanceListRow {
                id: entry.attendance_id,
                employee_id: entry.employee_id,
                name: Some(entry.name),
                date: entry.date.unwrap_or(day),
                check_in: entry.check_in_time,
                status: Some(status),
                created_at: entry.created_at,
                updated_at: entry.updated_at,
            }
        })
        .collect()
}

pub async fn list_attendance<S: AttendanceStore>(
    store: &S,
    query: &AttendanceQuery,
) -> Result<Vec<AttendanceListRow>, AppError> {
    match resolve_listing(query)? {
        Listing::Roster(day) => Ok(roster_rows(day, store.roster_for_day(day).await?)),
        Listing::Filtered(filter) => Ok(store
            .list_attendance(&filter)
            .await?
            .into_iter()
            .map(AttendanceListRow::from)
            .collect()),
    }
}
