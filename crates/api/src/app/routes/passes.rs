use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use campusgate_core::GatePassId;
use campusgate_passes::{GatePass, PassDetails, PassStatus};

use crate::app::{dto, errors, services::AppServices};
use crate::context::AuthContext;

pub async fn create_pass(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::CreateGatePassRequest>,
) -> axum::response::Response {
    let Some(journey_date) = body.journey_date else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "All fields are required!",
        );
    };

    let details = PassDetails {
        name: body.name,
        hostel_block: body.hostel_block,
        journey_date,
        leaving_time: body.leaving_time,
        destination: body.destination,
        reason: body.reason,
        luggage_details: body.luggage_details,
    };

    match services.create_pass(ctx.user_id(), details) {
        Ok(pass) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Gate pass requested successfully",
                "gatePass": services.render(&pass),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn my_passes(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> axum::response::Response {
    render_list(&services, services.my_passes(ctx.user_id()))
}

pub async fn update_transport(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::TransportRequest>,
) -> axum::response::Response {
    let id = match parse_pass_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.update_transport(id, ctx.user_id(), body.into()) {
        Ok(pass) => (
            StatusCode::OK,
            Json(json!({
                "message": "Transport details updated",
                "gatePass": services.render(&pass),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

pub async fn pending(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    render_list(&services, services.pending_passes())
}

pub async fn all(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<StatusFilter>,
) -> axum::response::Response {
    let status = match filter.status.as_deref() {
        None => None,
        Some("pending") => Some(PassStatus::Pending),
        Some("approved") => Some(PassStatus::Approved),
        Some("rejected") => Some(PassStatus::Rejected),
        Some(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "status must be one of: pending, approved, rejected",
            );
        }
    };

    render_list(&services, services.all_passes(status))
}

pub async fn approved(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    render_list(&services, services.approved_passes())
}

pub async fn approved_sorted(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    render_list(&services, services.approved_by_journey_date())
}

pub async fn approve(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_pass_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.approve_pass(id, ctx.user_id()) {
        Ok(pass) => (
            StatusCode::OK,
            Json(json!({
                "message": "Gate pass approved successfully",
                "gatePass": services.render(&pass),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn reject(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::RejectRequest>,
) -> axum::response::Response {
    let id = match parse_pass_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.reject_pass(id, ctx.user_id(), body.rejection_reason) {
        Ok(pass) => (
            StatusCode::OK,
            Json(json!({
                "message": "Gate pass rejected successfully",
                "gatePass": services.render(&pass),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn record_transport(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::TransportRequest>,
) -> axum::response::Response {
    let id = match parse_pass_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.record_transport(id, body.into()) {
        Ok(pass) => (
            StatusCode::OK,
            Json(json!({
                "message": "Transport details saved successfully!",
                "gatePass": services.render(&pass),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn guard_verify(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_pass_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.guard_verify(id) {
        Ok(pass) => (
            StatusCode::OK,
            Json(json!({
                "message": "Gate pass verified by guard",
                "gatePass": services.render(&pass),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_pass_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.pass_for(id, ctx.user_id(), ctx.role()) {
        Ok(pass) => (StatusCode::OK, Json(services.render(&pass))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn public_all(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    render_list(&services, services.public_passes())
}

fn render_list(services: &AppServices, passes: Vec<GatePass>) -> axum::response::Response {
    let items: Vec<_> = passes.iter().map(|p| services.render(p)).collect();
    (StatusCode::OK, Json(items)).into_response()
}

fn parse_pass_id(raw: &str) -> Result<GatePassId, axum::response::Response> {
    raw.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid gate pass id")
    })
}
