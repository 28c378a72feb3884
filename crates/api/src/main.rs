use anyhow::Context;

use campusgate_api::app::{build_app, AppConfig};
use campusgate_identity::RegistrationPolicy;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    campusgate_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let mut policy = RegistrationPolicy::default();
    if let Ok(domain) = std::env::var("STUDENT_EMAIL_DOMAIN") {
        policy.student_email_domain = domain;
    }
    if let Ok(ids) = std::env::var("ADMIN_ALLOWLIST") {
        policy.admin_allowlist = ids
            .split(',')
            .map(|id| id.trim().to_uppercase())
            .filter(|id| !id.is_empty())
            .collect();
    }

    let app = build_app(AppConfig { jwt_secret, policy });

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
