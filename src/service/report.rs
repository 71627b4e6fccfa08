use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::error::AppError;
use crate::model::attendance::{Attendance, AttendanceFilter, AttendanceSummaryRow};
use crate::model::employee::Employee;
use crate::store::{AttendanceStore, EmployeeStore};

/// Check-ins strictly after this are late.
pub const LATE_AFTER: &str = "09:45:00";

const UNKNOWN_EMPLOYEE: &str = "Unknown";

/// First and last calendar day of a `YYYY-MM` month.
pub fn month_bounds(month: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let invalid = || AppError::invalid("Invalid month format. Use YYYY-MM");

    let (year, mon) = month.split_once('-').ok_or_else(invalid)?;
    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(year, 4) || !digits(mon, 2) {
        return Err(invalid());
    }

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let mon: u32 = mon.parse().map_err(|_| invalid())?;
    let first = NaiveDate::from_ymd_opt(year, mon, 1).ok_or_else(invalid)?;
    let (next_year, next_mon) = if mon == 12 { (year + 1, 1) } else { (year, mon + 1) };
    let last = NaiveDate::from_ymd_opt(next_year, next_mon, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(invalid)?;

    Ok((first, last))
}

/// Pads `H:M[:S]` to `HH:MM:SS` so it compares lexically against [`LATE_AFTER`].
pub fn padded_time(raw: &str) -> String {
    let mut parts = raw.split(':');
    let mut next = || {
        parts
            .next()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{p:0>2}"))
            .unwrap_or_else(|| "00".to_string())
    };
    let hours = next();
    let minutes = next();
    let seconds = next();
    format!("{hours}:{minutes}:{seconds}")
}

pub fn is_late(check_in_time: &str) -> bool {
    padded_time(check_in_time).as_str() > LATE_AFTER
}

/// Per-employee totals for one month of attendance, ordered by employee id.
/// Only employees with at least one record appear.
pub fn summarize(records: &[Attendance], employees: &[Employee]) -> Vec<AttendanceSummaryRow> {
    let names: HashMap<u64, &str> = employees.iter().map(|e| (e.id, e.name.as_str())).collect();

    let mut grouped: BTreeMap<u64, (BTreeSet<NaiveDate>, u32)> = BTreeMap::new();
    for record in records {
        let (days, late) = grouped.entry(record.employee_id).or_default();
        days.insert(record.date);
        if is_late(&record.check_in_time) {
            *late += 1;
        }
    }

    grouped
        .into_iter()
        .map(|(employee_id, (days, late))| AttendanceSummaryRow {
            employee_id,
            name: names
                .get(&employee_id)
                .copied()
                .unwrap_or(UNKNOWN_EMPLOYEE)
                .to_string(),
            days_present: days.len() as u32,
            times_late: late,
        })
        .collect()
}

pub async fn monthly_summary<S>(
    store: &S,
    month: &str,
    employee_id: Option<u64>,
) -> Result<Vec<AttendanceSummaryRow>, AppError>
where
    S: AttendanceStore + EmployeeStore,
{
    let (first, last) = month_bounds(month)?;
    let records = store
        .list_attendance(&AttendanceFilter {
            employee_id,
            date: None,
            from: Some(first),
            to: Some(last),
        })
        .await?;
    let employees = store.all_employees().await?;
    Ok(summarize(&records, &employees))
}
