use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use campusgate_identity::{AdminRegistration, StudentRegistration};

use crate::app::{dto, errors, services::AppServices};

pub async fn register_student(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterStudentRequest>,
) -> axum::response::Response {
    let reg = StudentRegistration {
        name: body.name,
        email: body.email,
        password: body.password,
        roll_number: body.roll_number,
        id_card_image_ref: body.id_card_image_ref,
    };

    match services.register_student(reg) {
        Ok(user) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Student registered successfully",
                "user": user,
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn register_admin(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterAdminRequest>,
) -> axum::response::Response {
    let reg = AdminRegistration {
        name: body.name,
        email: body.email,
        password: body.password,
        admin_id: body.admin_id,
    };

    match services.register_admin(reg) {
        Ok(user) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Admin registered successfully",
                "user": user,
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.login(&body.email, &body.password) {
        Ok((token, user)) => {
            (StatusCode::OK, Json(json!({ "token": token, "user": user }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
