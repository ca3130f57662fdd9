//! Core error types for xreply.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User-facing message for a generic generation failure.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate reply. Please try again.";

/// User-facing message for an exhausted rate limit.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please wait a moment.";

/// User-facing message for a rejected API key.
pub const INVALID_KEY_MESSAGE: &str = "Invalid API key. Please check your settings.";

/// User-facing message for a stale extension context.
pub const CONTEXT_INVALIDATED_MESSAGE: &str =
    "Extension was reloaded. Please refresh the page and try again.";

// ============================================================================
// Core Error
// ============================================================================

/// Error type for parsing and validation inside the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unknown provider identifier.
    #[error("Unsupported provider: {0}")]
    UnknownProvider(String),

    /// A value could not be parsed.
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Field being parsed.
        field: &'static str,
        /// Offending input.
        value: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ============================================================================
// Reply Error
// ============================================================================

/// Coarse category of a [`ReplyError`], carried across the message bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Settings must be fixed by the user.
    Configuration,
    /// Provider call failed.
    Provider,
    /// No composer on the page.
    ComposerNotFound,
    /// Every insertion strategy failed.
    InsertionFailed,
    /// The extension was reloaded under the page.
    ContextInvalidated,
    /// A generation is already running.
    Busy,
    /// The request itself was malformed.
    InvalidRequest,
}

/// User-facing error taxonomy.
///
/// Every failure that reaches the user is one of these. Lower layers keep
/// their own detailed errors and convert at the boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplyError {
    /// Missing or rejected API key, or a disabled extension.
    #[error("{0}")]
    Configuration(String),

    /// Provider failure after retry handling.
    #[error("{message}")]
    Provider {
        /// Summarized message.
        message: String,
        /// Whether the failure class was retryable.
        retryable: bool,
    },

    /// No composer could be located.
    #[error("Could not find tweet composer")]
    ComposerNotFound,

    /// All insertion strategies were exhausted.
    #[error("Failed to insert text after {attempts} attempts")]
    InsertionFailed {
        /// Number of strategies attempted.
        attempts: usize,
    },

    /// The extension context went away.
    #[error("{}", CONTEXT_INVALIDATED_MESSAGE)]
    ContextInvalidated,

    /// Another generation is in flight.
    #[error("Already generating a reply. Please wait...")]
    Busy,

    /// The request could not be understood.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ReplyError {
    /// Creates a "key not configured" error for a provider.
    pub fn missing_key(provider: crate::ProviderKind) -> Self {
        Self::Configuration(format!(
            "Please set your {} API key in extension settings",
            provider.display_name()
        ))
    }

    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::ComposerNotFound => ErrorKind::ComposerNotFound,
            Self::InsertionFailed { .. } => ErrorKind::InsertionFailed,
            Self::ContextInvalidated => ErrorKind::ContextInvalidated,
            Self::Busy => ErrorKind::Busy,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// Returns true if the user must change settings before retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns the message shown in a notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider { message, .. } if message.is_empty() => {
                GENERATION_FAILED_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }

    /// Rebuilds an error from a bridged `(kind, message)` pair.
    pub fn from_parts(kind: Option<ErrorKind>, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            Some(ErrorKind::Configuration) => Self::Configuration(message),
            Some(ErrorKind::ComposerNotFound) => Self::ComposerNotFound,
            Some(ErrorKind::InsertionFailed) => Self::InsertionFailed { attempts: 0 },
            Some(ErrorKind::ContextInvalidated) => Self::ContextInvalidated,
            Some(ErrorKind::Busy) => Self::Busy,
            Some(ErrorKind::InvalidRequest) => Self::InvalidRequest(message),
            Some(ErrorKind::Provider) | None => Self::Provider {
                message,
                retryable: false,
            },
        }
    }
}
