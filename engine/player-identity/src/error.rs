//! Error types for identity reconciliation

use thiserror::Error;

/// Result type alias for identity operations
pub type Result<T> = std::result::Result<T, IdentityError>;

/// Errors that can occur while decoding reconciliation input
///
/// Matching itself never fails; these only surface when the caller hands
/// over a payload that is not structurally a player list.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Payload is not valid JSON or a row does not fit the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level payload shape is not one we accept
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IdentityError {
    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
