use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::api::{ApiResponse, message};
use crate::error::AppError;
use crate::model::employee::{EmployeePatch, NewEmployee};
use crate::query::QueryMap;
use crate::service::employee as service;
use crate::store::Store;

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Nusrat Jahan")]
    pub name: String,
    #[schema(example = 29)]
    pub age: u32,
    #[schema(example = "Software Engineer")]
    pub designation: String,
    #[schema(example = "2023-03-01", format = "date", value_type = String)]
    pub hiring_date: NaiveDate,
    #[schema(example = "1996-05-14", format = "date", value_type = String)]
    pub date_of_birth: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(example = 85000.0, value_type = f64)]
    pub salary: Decimal,
    pub photo_path: Option<String>,
}

impl From<CreateEmployee> for NewEmployee {
    fn from(body: CreateEmployee) -> Self {
        NewEmployee {
            name: body.name,
            age: body.age,
            designation: body.designation,
            hiring_date: body.hiring_date,
            date_of_birth: body.date_of_birth,
            salary: body.salary,
            photo_path: body.photo_path,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub designation: Option<String>,
    #[schema(example = "2023-03-01", format = "date", value_type = Option<String>)]
    pub hiring_date: Option<NaiveDate>,
    #[schema(example = "1996-05-14", format = "date", value_type = Option<String>)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub salary: Option<Decimal>,
    pub photo_path: Option<String>,
}

impl From<UpdateEmployee> for EmployeePatch {
    fn from(body: UpdateEmployee) -> Self {
        EmployeePatch {
            name: body.name,
            age: body.age,
            designation: body.designation,
            hiring_date: body.hiring_date,
            date_of_birth: body.date_of_birth,
            salary: body.salary,
            photo_path: body.photo_path,
        }
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Matched case-insensitively against name and designation
    pub q: Option<String>,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = crate::model::employee::Employee),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "success": false,
            "message": "Employee age must be between 18 and 70"
        })),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn create_employee<S: Store>(
    store: web::Data<S>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, AppError> {
    let employee = service::create_employee(store.get_ref(), payload.into_inner().into()).await?;
    Ok(ApiResponse::new("Employee created successfully", employee).created())
}

/// List employees with filtering, sorting, projection and paging
#[utoipa::path(
    get,
    path = "/api/employees",
    params(
        ("search" = Option<String>, Query, description = "Search name and designation (alias: searchTerm, q)"),
        ("sort" = Option<String>, Query, description = "Comma-separated fields, `-` prefix for descending", example = "-age,name"),
        ("fields" = Option<String>, Query, description = "Comma-separated projection", example = "id,name,designation"),
        ("page" = Option<u64>, Query, description = "Page number, default 1"),
        ("limit" = Option<u64>, Query, description = "Page size, default 10"),
        ("age[gte]" = Option<String>, Query, description = "Any `field[op]` with op in gt, gte, lt, lte, ne; plain `field=value` for equality")
    ),
    responses(
        (status = 200, description = "Paginated employee list", body = Object, example = json!({
            "success": true,
            "message": "Employees retrieved successfully",
            "data": [{"id": 1, "name": "Nusrat Jahan", "age": 29}],
            "meta": {"page": 1, "limit": 10, "total": 1, "totalPage": 1}
        }))
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn list_employees<S: Store>(
    store: web::Data<S>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let params: QueryMap = query.into_inner().into_iter().collect();
    let page = service::list_employees(store.get_ref(), &params).await?;
    Ok(ApiResponse::paged("Employees retrieved successfully", page.data, page.meta).ok())
}

/// Search employees
#[utoipa::path(
    get,
    path = "/api/employees/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching employees", body = [crate::model::employee::Employee]),
        (status = 400, description = "Missing search query"),
        (status = 404, description = "Nothing matched")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn search_employees<S: Store>(
    store: web::Data<S>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let term = query.q.as_deref().unwrap_or_default();
    let employees = service::search_employees(store.get_ref(), term).await?;
    Ok(ApiResponse::new("Employees retrieved successfully", employees).ok())
}

/// Employees holding a designation
#[utoipa::path(
    get,
    path = "/api/employees/designation/{designation}",
    params(("designation" = String, Path, description = "Exact designation")),
    responses(
        (status = 200, description = "Employees with the designation", body = [crate::model::employee::Employee]),
        (status = 404, description = "No employee holds it")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn employees_by_designation<S: Store>(
    store: web::Data<S>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employees = service::employees_by_designation(store.get_ref(), &path.into_inner()).await?;
    Ok(ApiResponse::new("Employees retrieved successfully", employees).ok())
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = crate::model::employee::Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "success": false,
            "message": "Employee not found"
        }))
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn get_employee<S: Store>(
    store: web::Data<S>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let employee = service::get_employee(store.get_ref(), path.into_inner()).await?;
    Ok(ApiResponse::new("Employee retrieved successfully", employee).ok())
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated successfully", body = crate::model::employee::Employee),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn update_employee<S: Store>(
    store: web::Data<S>,
    path: web::Path<u64>,
    payload: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, AppError> {
    let employee =
        service::update_employee(store.get_ref(), path.into_inner(), payload.into_inner().into())
            .await?;
    Ok(ApiResponse::new("Employee updated successfully", employee).ok())
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "success": true,
            "message": "Employee deleted successfully"
        })),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn delete_employee<S: Store>(
    store: web::Data<S>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    service::delete_employee(store.get_ref(), path.into_inner()).await?;
    Ok(message("Employee deleted successfully"))
}
