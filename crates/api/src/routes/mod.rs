//! API routes.

pub mod admin;
pub mod analytics;
pub mod health;
pub mod submit;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/leads", post(submit::submit_lead))
        .route("/api/contacts", post(submit::submit_contact))
        .route("/api/investors", post(submit::submit_investor))
        .route("/api/analytics/pageview", post(analytics::track_pageview))
        .route("/api/analytics/event", post(analytics::track_event))
        .route("/api/admin/analytics", get(admin::analytics_summary))
        .route("/api/admin/:collection", get(admin::list_collection))
        .route("/api/admin/:collection/export", get(admin::export_csv))
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
