use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::ApiResponse;
use crate::error::AppError;
use crate::service::report as service;
use crate::store::Store;
use crate::utils::dates::parse_day;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthlyReportQuery {
    /// `YYYY-MM`; a full date or timestamp is reduced to its month
    #[param(example = "2025-08")]
    pub month: Option<String>,
    pub employee_id: Option<String>,
}

/// Reduces a date or timestamp to its `YYYY-MM` and pads `2025-8` to `2025-08`;
/// anything else passes through untouched.
fn normalize_month(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(day) = parse_day(raw) {
        return day.format("%Y-%m").to_string();
    }
    match raw.split_once('-') {
        Some((year, month)) if month.len() == 1 && month.bytes().all(|b| b.is_ascii_digit()) => {
            format!("{year}-0{month}")
        }
        _ => raw.to_string(),
    }
}

/// Monthly attendance summary per employee
#[utoipa::path(
    get,
    path = "/api/reports/attendance",
    params(MonthlyReportQuery),
    responses(
        (status = 200, description = "Days present and late arrivals per employee", body = [crate::model::attendance::AttendanceSummaryRow]),
        (status = 400, description = "Missing or malformed month", body = Object, example = json!({
            "success": false,
            "message": "Invalid month format. Use YYYY-MM"
        }))
    ),
    tag = "Report",
    security(("bearer_auth" = []))
)]
pub async fn monthly_attendance<S: Store>(
    store: web::Data<S>,
    query: web::Query<MonthlyReportQuery>,
) -> Result<HttpResponse, AppError> {
    let month = query
        .month
        .as_deref()
        .map(normalize_month)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::invalid("Month is required (YYYY-MM)"))?;

    let employee_id = match query.employee_id.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(raw) => Some(
            raw.parse::<u64>()
                .map_err(|_| AppError::invalid("employee_id must be a number"))?,
        ),
    };

    let rows = service::monthly_summary(store.get_ref(), &month, employee_id).await?;
    Ok(ApiResponse::new("Attendance report generated successfully", rows).ok())
}
