//! Admin endpoints: collection listing, CSV export, analytics summary.
//!
//! All gated on the configured admin token. Listing is newest-first; that
//! ordering is applied here on read, storage stays in insertion order.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use intake_core::{analytics::date_key, Collection, Record, ReferrerEntry};
use serde::Serialize;

use crate::extractors::AdminAuth;
use crate::response::ApiError;
use crate::state::AppState;

/// Referrers included in the analytics summary.
const SUMMARY_REFERRERS: usize = 10;

#[derive(Debug, Serialize)]
pub struct CollectionListing {
    pub collection: &'static str,
    pub count: usize,
    pub records: Vec<Record>,
}

/// GET /api/admin/:collection
pub async fn list_collection(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(name): Path<String>,
) -> Result<Json<CollectionListing>, ApiError> {
    let collection = parse_collection(&name)?;

    let mut records = state
        .store
        .read_all(collection)
        .await
        .map_err(|e| ApiError::from_store("read_all", collection.as_str(), e))?;

    records.sort_by_key(|r| std::cmp::Reverse(r.id));

    Ok(Json(CollectionListing {
        collection: collection.as_str(),
        count: records.len(),
        records,
    }))
}

/// GET /api/admin/:collection/export - CSV download.
pub async fn export_csv(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let collection = parse_collection(&name)?;

    let mut records = state
        .store
        .read_all(collection)
        .await
        .map_err(|e| ApiError::from_store("read_all", collection.as_str(), e))?;

    records.sort_by_key(|r| std::cmp::Reverse(r.id));

    let csv = render_csv(collection, &records);
    let disposition = format!("attachment; filename=\"{}.csv\"", collection.as_str());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub views_today: u64,
    pub views_last_7_days: u64,
    pub events_today: usize,
    pub recent_referrers: Vec<ReferrerEntry>,
}

/// GET /api/admin/analytics
pub async fn analytics_summary(
    State(state): State<AppState>,
    _auth: AdminAuth,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    let doc = state
        .store
        .read_analytics()
        .await
        .map_err(|e| ApiError::from_store("read", "analytics", e))?;

    let today = Utc::now().date_naive();
    let events_today = doc
        .events
        .get(&date_key(today))
        .map(Vec::len)
        .unwrap_or(0);

    Ok(Json(AnalyticsSummary {
        views_today: doc.views_on(today),
        views_last_7_days: doc.views_last_days(7),
        events_today,
        recent_referrers: doc
            .referrers
            .iter()
            .take(SUMMARY_REFERRERS)
            .cloned()
            .collect(),
    }))
}

fn parse_collection(name: &str) -> Result<Collection, ApiError> {
    Collection::parse(name)
        .ok_or_else(|| ApiError::not_found(format!("Unknown collection: {}", name)))
}

/// Exported columns per collection, beyond the common prefix.
fn extra_columns(collection: Collection) -> &'static [&'static str] {
    match collection {
        Collection::Leads => &["interest", "message"],
        Collection::Contacts => &["subject", "message"],
        Collection::Investors => &["company", "message"],
    }
}

fn render_csv(collection: Collection, records: &[Record]) -> String {
    let mut columns: Vec<&str> = vec!["id", "type", "timestamp", "name", "email"];
    columns.extend_from_slice(extra_columns(collection));

    let mut out = String::new();
    out.push_str(&columns.join(","));
    out.push_str("\r\n");

    for record in records {
        let mut row = vec![
            record.id.to_string(),
            record.kind.as_str().to_string(),
            record.timestamp.clone(),
        ];
        for column in &columns[3..] {
            row.push(csv_escape(record.field(column).unwrap_or_default()));
        }
        out.push_str(&row.join(","));
        out.push_str("\r\n");
    }
    out
}

/// RFC 4180 quoting: wrap when a field contains a comma, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
