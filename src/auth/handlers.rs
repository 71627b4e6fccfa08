use actix_web::{HttpResponse, web};
use tracing::{debug, info, instrument};

use crate::{
    api::ApiResponse,
    auth::jwt::generate_access_token,
    config::Config,
    error::AppError,
    models::{LoginReqDto, LoginResponse, LoginUser, RegisterReqDto},
    service::user::{self as users, UserInput},
    store::Store,
};

/// Register an HR user
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReqDto,
    responses(
        (status = 201, description = "User registered", body = crate::model::user::User),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered", body = Object, example = json!({
            "success": false,
            "message": "User with this email already exists"
        }))
    ),
    tag = "Auth"
)]
pub async fn register<S: Store>(
    store: web::Data<S>,
    payload: web::Json<RegisterReqDto>,
) -> Result<HttpResponse, AppError> {
    let body = payload.into_inner();
    let user = users::create_user(
        store.get_ref(),
        UserInput {
            email: Some(body.email),
            password: Some(body.password),
            name: Some(body.name),
        },
    )
    .await?;
    Ok(ApiResponse::new("User registered successfully", user).created())
}

/// Exchange email and password for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "success": false,
            "message": "Invalid credentials"
        }))
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(store, config, payload),
    fields(email = %payload.email)
)]
pub async fn login<S: Store>(
    store: web::Data<S>,
    config: web::Data<Config>,
    payload: web::Json<LoginReqDto>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    if payload.email.trim().is_empty() || payload.password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(AppError::invalid("Email and password are required"));
    }

    let user = users::authenticate(store.get_ref(), &payload.email, &payload.password)
        .await
        .inspect_err(|e| info!(error = %e, "Login rejected"))?;
    debug!(user_id = user.id, "Password verified");

    let token = generate_access_token(
        user.id,
        user.email.clone(),
        &config.jwt_secret,
        config.access_token_ttl,
    )?;

    info!(user_id = user.id, "Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        token,
        data: LoginUser {
            id: user.id,
            email: user.email,
            name: user.name,
        },
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    use crate::api::test_support::PEER;
    use crate::store::memory::MemoryStore;

    fn post(uri: &str, body: Value) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .peer_addr(PEER.parse().unwrap())
            .set_json(body)
    }

    #[actix_web::test]
    async fn register_login_then_call_protected_route() {
        let app = test_app!(MemoryStore::default());

        let resp = test::call_service(
            &app,
            post(
                "/auth/register",
                json!({"email": "hr@company.com", "password": "secret123", "name": "Farzana"}),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(
            &app,
            post("/auth/login", json!({"email": "hr@company.com", "password": "wrong-one"})).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = test::call_service(
            &app,
            post("/auth/login", json!({"email": "hr@company.com", "password": "secret123"})).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["email"], "hr@company.com");
        let token = body["token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/users")
            .peer_addr(PEER.parse().unwrap())
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn health_needs_no_token() {
        let app = test_app!(MemoryStore::default());
        let req = test::TestRequest::get()
            .uri("/api/health")
            .peer_addr(PEER.parse().unwrap())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
    }
}
