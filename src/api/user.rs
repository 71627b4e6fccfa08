use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::{ApiResponse, message};
use crate::error::AppError;
use crate::service::user::{self as service, UserInput};
use crate::store::Store;

/// Body for creating or editing an HR user. All fields are required on
/// create; any subset on update.
#[derive(Deserialize, ToSchema)]
pub struct UserRequest {
    #[schema(example = "hr@company.com")]
    pub email: Option<String>,
    #[schema(example = "secret123")]
    pub password: Option<String>,
    #[schema(example = "Farzana Akter")]
    pub name: Option<String>,
}

impl From<UserRequest> for UserInput {
    fn from(body: UserRequest) -> Self {
        UserInput {
            email: body.email,
            password: body.password,
            name: body.name,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = crate::model::user::User),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered")
    ),
    tag = "User",
    security(("bearer_auth" = []))
)]
pub async fn create_user<S: Store>(
    store: web::Data<S>,
    payload: web::Json<UserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = service::create_user(store.get_ref(), payload.into_inner().into()).await?;
    Ok(ApiResponse::new("User created successfully", user).created())
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All HR users", body = [crate::model::user::User])),
    tag = "User",
    security(("bearer_auth" = []))
)]
pub async fn list_users<S: Store>(store: web::Data<S>) -> Result<HttpResponse, AppError> {
    let users = service::list_users(store.get_ref()).await?;
    Ok(ApiResponse::new("Users retrieved successfully", users).ok())
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = crate::model::user::User),
        (status = 404, description = "User not found")
    ),
    tag = "User",
    security(("bearer_auth" = []))
)]
pub async fn get_user<S: Store>(
    store: web::Data<S>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let user = service::get_user(store.get_ref(), path.into_inner()).await?;
    Ok(ApiResponse::new("User retrieved successfully", user).ok())
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = crate::model::user::User),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use")
    ),
    tag = "User",
    security(("bearer_auth" = []))
)]
pub async fn update_user<S: Store>(
    store: web::Data<S>,
    path: web::Path<u64>,
    payload: web::Json<UserRequest>,
) -> Result<HttpResponse, AppError> {
    let user =
        service::update_user(store.get_ref(), path.into_inner(), payload.into_inner().into()).await?;
    Ok(ApiResponse::new("User updated successfully", user).ok())
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    tag = "User",
    security(("bearer_auth" = []))
)]
pub async fn delete_user<S: Store>(
    store: web::Data<S>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    service::delete_user(store.get_ref(), path.into_inner()).await?;
    Ok(message("User deleted successfully"))
}
