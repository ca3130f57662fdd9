//! Retry policy and controller for provider calls.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::FetchError;

// ============================================================================
// Retry Policy
// ============================================================================

/// Policy for retrying failed provider calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each retry.
    pub base_delay: Duration,
    /// Upper bound for any single delay, including `Retry-After`.
    pub max_delay: Duration,
    /// Whether a rate-limit `Retry-After` replaces the computed delay.
    pub honor_retry_after: bool,
}

impl RetryPolicy {
    /// Creates a policy with the given number of retries.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            honor_retry_after: true,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(0)
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the delay cap.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Returns the maximum number of network calls.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Calculates the backoff before retry number `retry` (zero-based).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Calculates the delay after `err`, honoring `Retry-After` when allowed.
    pub fn delay_after(&self, retry: u32, err: &FetchError) -> Duration {
        match err.retry_after() {
            Some(secs) if self.honor_retry_after => {
                Duration::from_secs(secs).min(self.max_delay)
            }
            _ => self.delay_for_retry(retry),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

// ============================================================================
// Retry Controller
// ============================================================================

/// Runs an operation under a [`RetryPolicy`] and a per-attempt timeout.
#[derive(Debug, Clone)]
pub struct RetryController {
    policy: RetryPolicy,
    timeout: Duration,
}

impl RetryController {
    /// Creates a controller.
    pub fn new(policy: RetryPolicy, timeout: Duration) -> Self {
        Self { policy, timeout }
    }

    /// Returns the policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs `op` until it succeeds, fails terminally, or retries run out.
    ///
    /// `op` receives the zero-based attempt number. Each attempt races the
    /// per-attempt timeout. Terminal errors are returned as-is; exhausting
    /// the retries yields [`FetchError::RetriesExhausted`].
    ///
    /// # Errors
    ///
    /// Returns the terminal error or the exhausted-retries summary.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<(T, u32), FetchError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 0u32;
        loop {
            let result = match tokio::time::timeout(self.timeout, op(attempt)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(self.timeout.as_secs())),
            };

            let err = match result {
                Ok(value) => {
                    debug!(attempt, "Provider call succeeded");
                    return Ok((value, attempt + 1));
                }
                Err(err) => err,
            };

            if !err.is_retryable() {
                debug!(attempt, error = %err, "Terminal provider error");
                return Err(err);
            }

            if attempt >= self.policy.max_retries {
                warn!(attempts = attempt + 1, error = %err, "Retries exhausted");
                return Err(FetchError::RetriesExhausted {
                    attempts: attempt + 1,
                    last: Box::new(err),
                });
            }

            let delay = self.policy.delay_after(attempt, &err);
            warn!(attempt, delay = ?delay, error = %err, "Retrying provider call");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
