//! Form submission endpoints.
//!
//! Each handler validates and sanitizes its payload, builds a record, and
//! hands it to the store. A store failure produces a generic "try again"
//! response; the record is then not persisted at all, never partially.

use axum::{extract::State, Json};
use intake_core::{ContactPayload, InvestorPayload, LeadPayload, Submission};
use telemetry::metrics;
use tracing::info;

use crate::extractors::ClientIp;
use crate::response::{ApiError, SubmitResponse};
use crate::state::AppState;

/// POST /api/leads
pub async fn submit_lead(
    state: State<AppState>,
    ip: ClientIp,
    Json(payload): Json<LeadPayload>,
) -> Result<Json<SubmitResponse>, ApiError> {
    persist(state, ip, payload).await
}

/// POST /api/contacts
pub async fn submit_contact(
    state: State<AppState>,
    ip: ClientIp,
    Json(payload): Json<ContactPayload>,
) -> Result<Json<SubmitResponse>, ApiError> {
    persist(state, ip, payload).await
}

/// POST /api/investors
pub async fn submit_investor(
    state: State<AppState>,
    ip: ClientIp,
    Json(payload): Json<InvestorPayload>,
) -> Result<Json<SubmitResponse>, ApiError> {
    persist(state, ip, payload).await
}

/// Shared submission path: rate limit, sanitize, append.
async fn persist<P: Submission>(
    State(state): State<AppState>,
    ip: ClientIp,
    payload: P,
) -> Result<Json<SubmitResponse>, ApiError> {
    metrics().submissions_received.inc();

    if !state.rate_limiter.check(ip.key()) {
        metrics().rate_limited_requests.inc();
        return Err(ApiError::rate_limited());
    }

    let record = payload.into_record(&state.ids).map_err(|e| {
        metrics().submissions_rejected.inc();
        ApiError::from(e)
    })?;

    let collection = record.kind.collection();
    let id = record.id;
    let timestamp = record.timestamp.clone();

    state
        .store
        .append(collection, record)
        .await
        .map_err(|e| ApiError::from_store("append", collection.as_str(), e))?;

    info!(collection = %collection, record_id = id, "Submission persisted");

    Ok(Json(SubmitResponse::new(id, timestamp)))
}
