//! Health endpoint.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Duration;

/// Health response body.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded".
    pub status: String,

    /// Server version.
    pub version: String,

    /// Whether the database answered within the probe timeout.
    pub database: bool,
}

/// GET /health
///
/// Liveness plus a bounded database probe; a slow or down database
/// degrades the status instead of hanging the endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Service degraded", body = HealthResponse),
    ),
    tag = "System"
)]
pub async fn health_handler(
    State(pool): State<PgPool>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = tokio::time::timeout(
        Duration::from_secs(2),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await
    .map(|r| r.is_ok())
    .unwrap_or(false);

    let (status_code, status) = if database {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
        }),
    )
}
