//! Store error taxonomy.
//!
//! Malformed on-disk data is a distinct error kind rather than being coerced
//! to an empty collection, so callers can tell "nothing persisted yet" apart
//! from "the file is damaged" and choose their own fallback.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Advisory lock still held elsewhere after the bounded retry budget.
    #[error("lock contended for {collection} after {attempts} attempts")]
    LockContended { collection: String, attempts: u32 },

    /// The file exists but does not parse as the expected JSON shape.
    #[error("corrupt data in {collection}: {source}")]
    Corrupt {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(serde_json::Error),

    #[error("store failure: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn corrupt(collection: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            collection: collection.into(),
            source,
        }
    }

    /// Whether this is the distinguishable malformed-data case.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}
