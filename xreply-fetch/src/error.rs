//! Fetch error types.

use thiserror::Error;
use xreply_core::{
    GENERATION_FAILED_MESSAGE, INVALID_KEY_MESSAGE, ProviderKind, RATE_LIMIT_MESSAGE, ReplyError,
};

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for provider calls.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limited by the provider.
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after: Option<u64>,
    },

    /// The provider rejected the API key.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// No API key configured.
    #[error("{} API key not configured", .0.display_name())]
    MissingApiKey(ProviderKind),

    /// The provider rejected the request.
    #[error("{0}")]
    BadRequest(String),

    /// The provider failed internally.
    #[error("Server error {status}: {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Provider message, if any.
        message: String,
    },

    /// Any other non-success status.
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Provider message, if any.
        message: String,
    },

    /// The response lacked the expected field path.
    #[error("Invalid response structure from {0} API")]
    MalformedResponse(String),

    /// The response contained no text.
    #[error("Empty reply from {0} API")]
    EmptyResponse(String),

    /// The body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Every retry failed.
    #[error("Maximum retries exceeded after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Network calls made.
        attempts: u32,
        /// The final failure.
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Returns true if another attempt may succeed.
    ///
    /// Server errors, rate limits, timeouts, transport failures and
    /// truncated bodies are retryable. Key problems, rejected requests and
    /// well-formed but unexpected payloads are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => !e.is_builder() && !e.is_redirect(),
            Self::Timeout(_)
            | Self::RateLimited { .. }
            | Self::ServerError { .. }
            | Self::Json(_) => true,
            Self::AuthenticationFailed(_)
            | Self::MissingApiKey(_)
            | Self::BadRequest(_)
            | Self::UnexpectedStatus { .. }
            | Self::MalformedResponse(_)
            | Self::EmptyResponse(_)
            | Self::InvalidUrl(_)
            | Self::DomainNotAllowed(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }

    /// Returns true if the user must fix the key.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_) | Self::MissingApiKey(_))
    }

    /// Returns the server-requested wait, if any.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Converts a body decode failure.
    ///
    /// Syntax and EOF errors mean a truncated or garbled body and stay
    /// retryable; data errors mean the shape is wrong.
    pub fn from_decode(provider: ProviderKind, err: serde_json::Error) -> Self {
        if err.is_data() {
            Self::MalformedResponse(provider.display_name().to_string())
        } else {
            Self::Json(err)
        }
    }
}

// ============================================================================
// User-facing conversion
// ============================================================================

impl From<FetchError> for ReplyError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::MissingApiKey(kind) => ReplyError::missing_key(kind),
            FetchError::AuthenticationFailed(_) => {
                ReplyError::Configuration(INVALID_KEY_MESSAGE.to_string())
            }
            FetchError::RetriesExhausted { last, .. } => {
                let message = if matches!(*last, FetchError::RateLimited { .. }) {
                    RATE_LIMIT_MESSAGE
                } else {
                    GENERATION_FAILED_MESSAGE
                };
                ReplyError::Provider {
                    message: message.to_string(),
                    retryable: true,
                }
            }
            err @ (FetchError::BadRequest(_)
            | FetchError::MalformedResponse(_)
            | FetchError::EmptyResponse(_)) => ReplyError::Provider {
                message: err.to_string(),
                retryable: false,
            },
            other => ReplyError::Provider {
                message: GENERATION_FAILED_MESSAGE.to_string(),
                retryable: other.is_retryable(),
            },
        }
    }
}
