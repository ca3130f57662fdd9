//! Composer error types.

use thiserror::Error;
use xreply_core::ReplyError;

// ============================================================================
// Port Error
// ============================================================================

/// Failure reported by a DOM or clipboard port.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PortError {
    /// The element was removed from the document.
    #[error("Element is no longer attached to the document")]
    Detached,

    /// The port cannot perform the operation.
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    /// The page or browser refused the operation.
    #[error("Permission denied: {0}")]
    Denied(String),

    /// The selector could not be parsed.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// A page script threw.
    #[error("Script error: {0}")]
    Script(String),
}

// ============================================================================
// Composer Error
// ============================================================================

/// Error type for locating the composer and inserting text into it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ComposerError {
    /// No composer appeared before the wait expired.
    #[error("Could not find tweet composer after {waited_ms} ms")]
    NotFound {
        /// How long the locator waited.
        waited_ms: u64,
    },

    /// Every insertion strategy ran without a verified result.
    #[error("All insertion methods exhausted after {attempts} attempts")]
    AllMethodsExhausted {
        /// Strategies attempted.
        attempts: usize,
    },

    /// Nothing to insert.
    #[error("Refusing to insert empty text")]
    EmptyText,

    /// A port operation failed.
    #[error(transparent)]
    Port(#[from] PortError),
}

impl From<ComposerError> for ReplyError {
    fn from(err: ComposerError) -> Self {
        match err {
            ComposerError::NotFound { .. } | ComposerError::Port(PortError::Detached) => {
                ReplyError::ComposerNotFound
            }
            ComposerError::AllMethodsExhausted { attempts } => {
                ReplyError::InsertionFailed { attempts }
            }
            ComposerError::EmptyText => ReplyError::InvalidRequest(err.to_string()),
            ComposerError::Port(_) => ReplyError::InsertionFailed { attempts: 0 },
        }
    }
}
