use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::api::{ApiResponse, message};
use crate::error::AppError;
use crate::service::attendance::{self as service, AttendanceChanges, AttendanceQuery, CheckIn};
use crate::store::Store;

#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = 1)]
    pub employee_id: u64,
    /// Any date or timestamp; only the calendar day is kept
    #[schema(example = "2025-08-12")]
    pub date: String,
    /// 24-hour `HH:MM`
    #[schema(example = "09:05")]
    pub check_in_time: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateAttendance {
    pub employee_id: Option<u64>,
    #[schema(example = "2025-08-12")]
    pub date: Option<String>,
    #[schema(example = "09:30")]
    pub check_in_time: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ByDateQuery {
    #[param(example = "2025-08-12")]
    pub date: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    #[param(example = "2025-08-01")]
    pub start_date: Option<String>,
    #[param(example = "2025-08-31")]
    pub end_date: Option<String>,
}

/// Record a check-in (upsert per employee and day)
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CheckInRequest,
    responses(
        (status = 201, description = "Attendance recorded", body = crate::model::attendance::Attendance),
        (status = 400, description = "Invalid date or time", body = Object, example = json!({
            "success": false,
            "message": "Invalid time format. Use HH:MM format"
        })),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn check_in<S: Store>(
    store: web::Data<S>,
    payload: web::Json<CheckInRequest>,
) -> Result<HttpResponse, AppError> {
    let body = payload.into_inner();
    let record = service::record_check_in(
        store.get_ref(),
        CheckIn {
            employee_id: body.employee_id,
            date: body.date,
            check_in_time: body.check_in_time,
        },
    )
    .await?;
    Ok(ApiResponse::new("Attendance recorded successfully", record).created())
}

/// Filtered attendance list, or a present/absent roster for one day
#[utoipa::path(
    get,
    path = "/api/attendance/date",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance rows", body = [crate::model::attendance::AttendanceListRow]),
        (status = 400, description = "Invalid filter combination")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn list_attendance<S: Store>(
    store: web::Data<S>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, AppError> {
    let rows = service::list_attendance(store.get_ref(), &query.into_inner()).await?;
    Ok(ApiResponse::new("Attendance retrieved successfully", rows).ok())
}

/// Same as the list endpoint; the path segment fills `date` when the query omits it
#[utoipa::path(
    get,
    path = "/api/attendance/date/{date}",
    params(("date" = String, Path, description = "Day to list"), AttendanceQuery),
    responses(
        (status = 200, description = "Attendance rows", body = [crate::model::attendance::AttendanceListRow]),
        (status = 400, description = "Invalid filter combination")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn list_attendance_on<S: Store>(
    store: web::Data<S>,
    path: web::Path<String>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, AppError> {
    let mut query = query.into_inner();
    if query.date.as_deref().is_none_or(|d| d.trim().is_empty()) {
        query.date = Some(path.into_inner());
    }
    let rows = service::list_attendance(store.get_ref(), &query).await?;
    Ok(ApiResponse::new("Attendance retrieved successfully", rows).ok())
}

/// Attendance for one day, by check-in time
#[utoipa::path(
    get,
    path = "/api/attendance/by-date",
    params(ByDateQuery),
    responses(
        (status = 200, description = "Attendance on the day", body = [crate::model::attendance::Attendance]),
        (status = 400, description = "Missing or invalid date")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn attendance_by_date<S: Store>(
    store: web::Data<S>,
    query: web::Query<ByDateQuery>,
) -> Result<HttpResponse, AppError> {
    let date = query.date.as_deref().unwrap_or_default();
    let records = service::attendance_on(store.get_ref(), date).await?;
    Ok(ApiResponse::new("Attendance retrieved successfully", records).ok())
}

/// Raw attendance rows between two days, inclusive
#[utoipa::path(
    get,
    path = "/api/attendance/report",
    params(RangeQuery),
    responses(
        (status = 200, description = "Attendance in range", body = [crate::model::attendance::Attendance]),
        (status = 400, description = "Missing or invalid dates")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn attendance_report<S: Store>(
    store: web::Data<S>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, AppError> {
    let records = service::attendance_between(
        store.get_ref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
    )
    .await?;
    Ok(ApiResponse::new("Attendance report retrieved successfully", records).ok())
}

/// One employee's attendance history
#[utoipa::path(
    get,
    path = "/api/attendance/employee/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Attendance history, newest first", body = [crate::model::attendance::Attendance]),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn employee_attendance<S: Store>(
    store: web::Data<S>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let records = service::attendance_for_employee(store.get_ref(), path.into_inner()).await?;
    Ok(ApiResponse::new("Attendance retrieved successfully", records).ok())
}

#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(("id" = u64, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Attendance record", body = crate::model::attendance::Attendance),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn get_attendance<S: Store>(
    store: web::Data<S>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let record = service::get_attendance(store.get_ref(), path.into_inner()).await?;
    Ok(ApiResponse::new("Attendance retrieved successfully", record).ok())
}

#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(("id" = u64, Path, description = "Attendance ID")),
    request_body = UpdateAttendance,
    responses(
        (status = 200, description = "Attendance updated", body = crate::model::attendance::Attendance),
        (status = 400, description = "Invalid update"),
        (status = 404, description = "Attendance or employee not found"),
        (status = 409, description = "Employee already has a record for that day")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn update_attendance<S: Store>(
    store: web::Data<S>,
    path: web::Path<u64>,
    payload: web::Json<UpdateAttendance>,
) -> Result<HttpResponse, AppError> {
    let body = payload.into_inner();
    let record = service::update_attendance(
        store.get_ref(),
        path.into_inner(),
        AttendanceChanges {
            employee_id: body.employee_id,
            date: body.date,
            check_in_time: body.check_in_time,
        },
    )
    .await?;
    Ok(ApiResponse::new("Attendance updated successfully", record).ok())
}

#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(("id" = u64, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Attendance deleted"),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn delete_attendance<S: Store>(
    store: web::Data<S>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    service::delete_attendance(store.get_ref(), path.into_inner()).await?;
    Ok(message("Attendance deleted successfully"))
}
