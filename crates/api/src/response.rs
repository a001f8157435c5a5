//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Success response for a form submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub id: i64,
    pub timestamp: String,
}

impl SubmitResponse {
    pub fn new(id: i64, timestamp: impl Into<String>) -> Self {
        Self {
            success: true,
            id,
            timestamp: timestamp.into(),
        }
    }
}

/// Success response for an analytics tracking call.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrackResponse {
    pub success: bool,
}

impl TrackResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// API error type.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse {
                error: msg.into(),
                code: code.into(),
            },
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST, "validation_failed", msg)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::UNAUTHORIZED, "unauthorized", msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::NOT_FOUND, "not_found", msg)
    }

    pub fn rate_limited() -> Self {
        Self::with_code(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "Too many requests. Please slow down.",
        )
    }

    /// The user-facing shape of every store/internal failure: a generic
    /// "try again", with the detail kept in the server log.
    pub fn try_again() -> Self {
        Self::with_code(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "Something went wrong. Please try again.",
        )
    }

    /// Log a store failure with operation context and return the generic
    /// response. Record contents never reach the log or the client.
    pub fn from_store(operation: &str, collection: &str, err: store::StoreError) -> Self {
        if err.is_corrupt() {
            telemetry::metrics().store_corrupt_reads.inc();
        }
        error!(operation, collection, error = %err, "Store operation failed");
        Self::try_again()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<intake_core::Error> for ApiError {
    fn from(err: intake_core::Error) -> Self {
        let intake_core::Error::Validation(msg) = err;
        ApiError::bad_request(msg)
    }
}
