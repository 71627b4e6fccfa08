use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "hr@company.com")]
    pub email: String,
    #[schema(example = "secret123")]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterReqDto {
    #[schema(example = "hr@company.com")]
    pub email: String,
    #[schema(example = "secret123")]
    pub password: String,
    #[schema(example = "Farzana Akter")]
    pub name: String,
}

/// Public part of an HR user returned after login.
#[derive(Serialize, ToSchema)]
pub struct LoginUser {
    pub id: u64,
    pub email: String,
    pub name: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub data: LoginUser,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// Email of the HR user
    pub sub: String,
    pub exp: usize,
    pub jti: String,
}
