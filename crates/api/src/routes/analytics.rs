//! Analytics tracking endpoints.
//!
//! Page views and custom events both funnel through the store's
//! read-modify-write primitive, so counting and event-append share one
//! concurrency-safe path.

use axum::{extract::State, Json};
use intake_core::limits::{MAX_EVENT_NAME_LEN, MAX_PAGE_LEN, MAX_REFERRER_LEN};
use intake_core::sanitize::sanitize_field;
use serde::Deserialize;
use telemetry::metrics;

use crate::extractors::ClientIp;
use crate::response::{ApiError, TrackResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageViewPayload {
    pub page: String,
    pub referrer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventPayload {
    pub name: String,
    pub page: Option<String>,
}

/// POST /api/analytics/pageview
pub async fn track_pageview(
    State(state): State<AppState>,
    ip: ClientIp,
    Json(payload): Json<PageViewPayload>,
) -> Result<Json<TrackResponse>, ApiError> {
    if !state.rate_limiter.check(ip.key()) {
        metrics().rate_limited_requests.inc();
        return Err(ApiError::rate_limited());
    }

    let page = sanitize_field(&payload.page, MAX_PAGE_LEN);
    if page.is_empty() {
        return Err(ApiError::bad_request("page is required"));
    }
    let referrer = payload
        .referrer
        .as_deref()
        .map(|r| sanitize_field(r, MAX_REFERRER_LEN))
        .filter(|r| !r.is_empty());

    state
        .store
        .mutate_analytics(Box::new(move |doc| {
            doc.record_page_view(&page, referrer.as_deref())
        }))
        .await
        .map_err(|e| ApiError::from_store("mutate", "analytics", e))?;

    metrics().pageviews_tracked.inc();
    Ok(Json(TrackResponse::ok()))
}

/// POST /api/analytics/event
pub async fn track_event(
    State(state): State<AppState>,
    ip: ClientIp,
    Json(payload): Json<EventPayload>,
) -> Result<Json<TrackResponse>, ApiError> {
    if !state.rate_limiter.check(ip.key()) {
        metrics().rate_limited_requests.inc();
        return Err(ApiError::rate_limited());
    }

    let name = sanitize_field(&payload.name, MAX_EVENT_NAME_LEN);
    if name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    let page = payload
        .page
        .as_deref()
        .map(|p| sanitize_field(p, MAX_PAGE_LEN))
        .filter(|p| !p.is_empty());

    state
        .store
        .mutate_analytics(Box::new(move |doc| doc.record_event(&name, page.as_deref())))
        .await
        .map_err(|e| ApiError::from_store("mutate", "analytics", e))?;

    metrics().events_tracked.inc();
    Ok(Json(TrackResponse::ok()))
}
