//! Domain error for the intake engine core.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// The one failure the core model itself produces: a payload that does not
/// satisfy its validation rules. Transport and storage failures carry their
/// own types in the crates that own them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
