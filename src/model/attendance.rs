use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 10)]
    pub id: u64,
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "2025-08-12", value_type = String, format = "date")]
    pub date: NaiveDate,
    /// Zero-padded `HH:MM`
    #[schema(example = "09:05")]
    pub check_in_time: String,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct AttendancePatch {
    pub employee_id: Option<u64>,
    pub date: Option<NaiveDate>,
    pub check_in_time: Option<String>,
}

/// Predicates for the attendance list endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceFilter {
    pub employee_id: Option<u64>,
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// One employee joined with (possibly missing) attendance for a single day.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RosterEntry {
    pub employee_id: u64,
    pub name: String,
    pub attendance_id: Option<u64>,
    pub date: Option<NaiveDate>,
    pub check_in_time: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// Row shape returned by the attendance list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceListRow {
    pub id: Option<u64>,
    pub employee_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub check_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Attendance> for AttendanceListRow {
    fn from(a: Attendance) -> Self {
        Self {
            id: Some(a.id),
            employee_id: a.employee_id,
            name: None,
            date: a.date,
            check_in: Some(a.check_in_time),
            status: None,
            created_at: Some(a.created_at),
            updated_at: Some(a.updated_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceSummaryRow {
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "Nusrat Jahan")]
    pub name: String,
    #[schema(example = 21)]
    pub days_present: u32,
    #[schema(example = 2)]
    pub times_late: u32,
}
