use crate::{
    api::{attendance, employee, report, user},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::AppError,
    store::Store,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, Responder, middleware::from_fn, web};
use serde_json::json;
use std::sync::Arc;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = Object, example = json!({
        "success": true,
        "message": "OK"
    }))),
    tag = "Health"
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "OK"
    }))
}

/// Malformed JSON bodies, query strings and path segments become `InvalidInput`.
fn extractor_errors() -> (web::JsonConfig, web::QueryConfig, web::PathConfig) {
    (
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::invalid(err.to_string()).into()),
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::invalid(err.to_string()).into()),
        web::PathConfig::default()
            .error_handler(|err, _| AppError::invalid(err.to_string()).into()),
    )
}

/// Per-route limiter keyed on peer IP: a burst of `requests_per_min`, refilled evenly over a minute.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("non-zero period and burst size");
    Governor::new(&cfg)
}

pub fn configure<S: Store>(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    let (json_cfg, query_cfg, path_cfg) = extractor_errors();
    cfg.app_data(json_cfg).app_data(query_cfg).app_data(path_cfg);

    cfg.route(
        &format!("{}/health", config.api_prefix),
        web::get().to(health),
    );

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login::<S>)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register::<S>)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .service(
                web::scope("/users")
                    .service(
                        web::resource("")
                            .route(web::post().to(user::create_user::<S>))
                            .route(web::get().to(user::list_users::<S>)),
                    )
                    .service(
                        web::resource("/{id:\\d+}")
                            .route(web::get().to(user::get_user::<S>))
                            .route(web::put().to(user::update_user::<S>))
                            .route(web::delete().to(user::delete_user::<S>)),
                    ),
            )
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee::<S>))
                            .route(web::get().to(employee::list_employees::<S>)),
                    )
                    .service(
                        web::resource("/search").route(web::get().to(employee::search_employees::<S>)),
                    )
                    .service(
                        web::resource("/designation/{designation}")
                            .route(web::get().to(employee::employees_by_designation::<S>)),
                    )
                    .service(
                        web::resource("/{id:\\d+}")
                            .route(web::get().to(employee::get_employee::<S>))
                            .route(web::put().to(employee::update_employee::<S>))
                            .route(web::delete().to(employee::delete_employee::<S>)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(web::resource("").route(web::post().to(attendance::check_in::<S>)))
                    .service(
                        web::resource("/date").route(web::get().to(attendance::list_attendance::<S>)),
                    )
                    .service(
                        web::resource("/date/{date}")
                            .route(web::get().to(attendance::list_attendance_on::<S>)),
                    )
                    .service(
                        web::resource("/by-date")
                            .route(web::get().to(attendance::attendance_by_date::<S>)),
                    )
                    .service(
                        web::resource("/report")
                            .route(web::get().to(attendance::attendance_report::<S>)),
                    )
                    .service(
                        web::resource("/employee/{employee_id:\\d+}")
                            .route(web::get().to(attendance::employee_attendance::<S>)),
                    )
                    .service(
                        web::resource("/{id:\\d+}")
                            .route(web::get().to(attendance::get_attendance::<S>))
                            .route(web::put().to(attendance::update_attendance::<S>))
                            .route(web::delete().to(attendance::delete_attendance::<S>)),
                    ),
            )
            .service(
                web::scope("/reports").service(
                    web::resource("/attendance")
                        .route(web::get().to(report::monthly_attendance::<S>)),
                ),
            ),
    );
}
