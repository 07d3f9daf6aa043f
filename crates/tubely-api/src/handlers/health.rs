//! Health check handler and response type.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub database: String,
}

/// Liveness plus database reachability.
#[utoipa::path(
    get,
    path = "/health",
    tag = "config",
    responses(
        (status = 200, description = "Service healthy", body = HealthCheckResponse),
        (status = 503, description = "Database unreachable", body = HealthCheckResponse)
    )
)]
pub async fn health_check(state: Arc<AppState>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let (healthy, database) = match tokio::time::timeout(TIMEOUT, state.videos.ping()).await {
        Ok(Ok(())) => (true, "healthy".to_string()),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Database health check failed");
            (false, format!("unhealthy: {}", e))
        }
        Err(_) => {
            tracing::error!("Database health check timed out");
            (false, "timeout".to_string())
        }
    };

    let (status_code, status) = if healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthCheckResponse {
            status: status.to_string(),
            database,
        }),
    )
}
