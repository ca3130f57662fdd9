//! Bridge error types.

use thiserror::Error;
use xreply_core::{GENERATION_FAILED_MESSAGE, ReplyError};
use xreply_store::StoreError;

/// Runtime failure text for a context whose extension went away.
const INVALIDATED_MARKERS: &[&str] = &[
    "extension context invalidated",
    "receiving end does not exist",
];

/// Errors raised while moving messages between contexts.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The privileged side is gone; the page must be reloaded.
    #[error("Extension context invalidated")]
    ContextInvalidated,

    /// The request was delivered but no response came back.
    #[error("The message port closed before a response was received")]
    NoResponse,

    /// Any other runtime failure.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// A message could not be encoded or decoded.
    #[error("Protocol error: {0}")]
    Protocol(#[from] serde_json::Error),

    /// Settings could not be read.
    #[error("Settings error: {0}")]
    Store(#[from] StoreError),
}

impl BridgeError {
    /// Classifies a runtime failure message.
    pub fn from_runtime_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_ascii_lowercase();
        if INVALIDATED_MARKERS.iter().any(|m| lowered.contains(m)) {
            Self::ContextInvalidated
        } else {
            Self::Runtime(message)
        }
    }

    /// Returns true if the page must be reloaded.
    pub fn is_context_invalidated(&self) -> bool {
        matches!(self, Self::ContextInvalidated)
    }
}

impl From<BridgeError> for ReplyError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::ContextInvalidated => ReplyError::ContextInvalidated,
            BridgeError::Protocol(e) => ReplyError::InvalidRequest(e.to_string()),
            BridgeError::Store(e) => ReplyError::Configuration(format!("Failed to read settings: {e}")),
            BridgeError::NoResponse | BridgeError::Runtime(_) => ReplyError::Provider {
                message: GENERATION_FAILED_MESSAGE.to_string(),
                retryable: true,
            },
        }
    }
}
