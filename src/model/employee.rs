use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Nusrat Jahan",
        "age": 29,
        "designation": "Software Engineer",
        "hiring_date": "2023-03-01",
        "date_of_birth": "1996-05-14",
        "salary": 85000.0,
        "photo_path": null,
        "created_at": "2025-08-01T09:00:00Z",
        "updated_at": "2025-08-01T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Nusrat Jahan")]
    pub name: String,

    #[schema(example = 29)]
    pub age: u32,

    #[schema(example = "Software Engineer")]
    pub designation: String,

    #[schema(example = "2023-03-01", value_type = String, format = "date")]
    pub hiring_date: NaiveDate,

    #[schema(example = "1996-05-14", value_type = String, format = "date")]
    pub date_of_birth: NaiveDate,

    #[serde(with = "rust_decimal::serde::float")]
    #[schema(example = 85000.0, value_type = f64)]
    pub salary: Decimal,

    #[schema(nullable = true)]
    pub photo_path: Option<String>,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new employee row.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub age: u32,
    pub designation: String,
    pub hiring_date: NaiveDate,
    pub date_of_birth: NaiveDate,
    pub salary: Decimal,
    pub photo_path: Option<String>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub designation: Option<String>,
    pub hiring_date: Option<NaiveDate>,
    pub date_of_birth: Option<NaiveDate>,
    pub salary: Option<Decimal>,
    pub photo_path: Option<String>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.designation.is_none()
            && self.hiring_date.is_none()
            && self.date_of_birth.is_none()
            && self.salary.is_none()
            && self.photo_path.is_none()
    }
}

/// Columns the generic listing may search over.
pub const EMPLOYEE_SEARCH_FIELDS: &[&str] = &["name", "designation"];
