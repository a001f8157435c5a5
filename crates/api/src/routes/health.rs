//! Health check endpoints.

use axum::{http::StatusCode, Json};
use telemetry::{health, HealthReport};

/// GET /health - Full health check.
pub async fn health_handler() -> Json<HealthReport> {
    Json(health().report())
}

/// GET /health/ready - Readiness probe (store is writable).
pub async fn ready_handler() -> StatusCode {
    if health().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - Liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    StatusCode::OK
}
