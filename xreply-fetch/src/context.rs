//! Fetch context shared by all provider adapters.

use std::time::Duration;

use crate::http::{DEFAULT_TIMEOUT_SECS, HttpClient};
use crate::retry::{RetryController, RetryPolicy};

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for provider calls.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

impl FetchSettings {
    /// Sets the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Everything an adapter needs to make a call.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    /// HTTP client.
    pub http: HttpClient,
    /// Call settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context with default settings and an unrestricted client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the HTTP client.
    pub fn with_http(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    /// Replaces the settings.
    pub fn with_settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builds a retry controller from the settings.
    pub fn retry_controller(&self) -> RetryController {
        RetryController::new(self.settings.retry.clone(), self.settings.timeout)
    }
}
