//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: registration/login and the gate-pass workflows
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Extension, Router,
};
use tower::ServiceBuilder;

use campusgate_auth::{Hs256TokenCodec, Role};
use campusgate_identity::RegistrationPolicy;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub struct AppConfig {
    pub jwt_secret: String,
    pub policy: RegistrationPolicy,
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: AppConfig) -> Router {
    let tokens = Arc::new(Hs256TokenCodec::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState {
        tokens: tokens.clone(),
    };

    let services = Arc::new(services::AppServices::new(config.policy, tokens));

    let auth_routes = Router::new()
        .route("/register-student", post(routes::auth::register_student))
        .route("/register-admin", post(routes::auth::register_admin))
        .route("/login", post(routes::auth::login));

    let student_routes = Router::new()
        .route("/create", post(routes::passes::create_pass))
        .route("/my-requests", get(routes::passes::my_passes))
        .route(
            "/student/update-transport/:id",
            put(routes::passes::update_transport),
        )
        .layer(axum::middleware::from_fn_with_state(
            Role::Student,
            middleware::require_role,
        ));

    let admin_routes = Router::new()
        .route("/pending", get(routes::passes::pending))
        .route("/all", get(routes::passes::all))
        .route("/approved", get(routes::passes::approved))
        .route("/approved/sorted", get(routes::passes::approved_sorted))
        .route("/approve/:id", post(routes::passes::approve))
        .route("/reject/:id", post(routes::passes::reject))
        .route("/verify/:id", post(routes::passes::record_transport))
        .route("/verify/final/:id", put(routes::passes::guard_verify))
        .layer(axum::middleware::from_fn_with_state(
            Role::Admin,
            middleware::require_role,
        ));

    // Any authenticated role; ownership is enforced in the handler.
    let shared_routes = Router::new().route("/:id", get(routes::passes::get_by_id));

    let protected = Router::new()
        .merge(student_routes)
        .merge(admin_routes)
        .merge(shared_routes)
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    let gatepass_routes = Router::new()
        .route("/public/all", get(routes::passes::public_all))
        .merge(protected);

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/auth", auth_routes)
        .nest("/api/gatepass", gatepass_routes)
        .layer(Extension(services))
        .layer(ServiceBuilder::new())
}
