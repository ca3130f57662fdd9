//! Store error types.

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored record is not a JSON object.
    #[error("Settings record must be a JSON object")]
    NotAnObject,

    /// A field was given a value it cannot hold.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// Settings key.
        key: String,
        /// Why the value was rejected.
        message: String,
    },

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl StoreError {
    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Io(_))
    }
}
