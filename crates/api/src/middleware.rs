use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use campusgate_auth::{Hs256TokenCodec, Role, TokenError};

use crate::app::errors::json_error;
use crate::context::AuthContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<Hs256TokenCodec>,
}

/// Verify the bearer token and attach an [`AuthContext`] to the request.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let claims = match state.tokens.verify(token, Utc::now()) {
        Ok(c) => c,
        Err(TokenError::Expired) => {
            return json_error(StatusCode::UNAUTHORIZED, "unauthorized", "Token expired");
        }
        Err(_) => {
            return json_error(StatusCode::UNAUTHORIZED, "unauthorized", "Invalid token");
        }
    };

    req.extensions_mut()
        .insert(AuthContext::new(claims.sub, claims.role));

    next.run(req).await
}

/// Reject requests whose authenticated role differs from `role`.
///
/// Layered inside `auth_middleware`, so a missing context means the route was
/// wired without authentication.
pub async fn require_role(
    State(role): State<Role>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(ctx) = req.extensions().get::<AuthContext>() else {
        return json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Authentication required",
        );
    };

    if ctx.role() != role {
        return json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            format!("Access denied. {role} role required."),
        );
    }

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, Response> {
    let denied = || {
        json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Access denied. No token provided.",
        )
    };

    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(denied)?;

    let header = header.to_str().map_err(|_| denied())?;
    let token = header.strip_prefix("Bearer ").ok_or_else(denied)?.trim();

    if token.is_empty() {
        return Err(denied());
    }

    Ok(token)
}
