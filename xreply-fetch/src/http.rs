//! HTTP client with tracing and domain allowlist.
//!
//! This module provides a wrapped HTTP client that adds:
//! - Request/response tracing
//! - Domain allowlist so keys only ever travel to known provider hosts
//! - Status classification into [`FetchError`] variants

use reqwest::{Client, Response, StatusCode, header, header::HeaderMap};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::FetchError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for xreply.
const USER_AGENT: &str = concat!("xreply/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing and domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built. This should only occur
    /// if the system's TLS configuration is fundamentally broken, making
    /// network operations impossible.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                panic!(
                    "Failed to create HTTP client: {e}. \
                    This usually indicates a broken TLS configuration."
                )
            });

        Self {
            inner: client,
            allowed_domains: None,
        }
    }

    /// Creates a new HTTP client with domain allowlist.
    ///
    /// Only requests to domains in the allowlist will be permitted.
    pub fn with_allowed_domains(domains: Vec<String>) -> Self {
        let mut client = Self::new();
        client.allowed_domains = Some(domains);
        client
    }

    /// Restricts an existing client to the given domains.
    pub fn restrict_to(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), FetchError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(());
        };

        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(FetchError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Performs a POST request with JSON body.
    #[instrument(skip(self, body), fields(url = %redact_query(url)))]
    pub async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<Response, FetchError> {
        self.post_json_with_headers(url, HeaderMap::new(), body).await
    }

    /// Performs a POST request with JSON body and extra headers.
    #[instrument(skip(self, headers, body), fields(url = %redact_query(url)))]
    pub async fn post_json_with_headers<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &T,
    ) -> Result<Response, FetchError> {
        self.is_domain_allowed(url)?;
        debug!("POST request with JSON");

        let response = self
            .inner
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    FetchError::Http(e)
                }
            })?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Returns the inner reqwest client for advanced operations.
    pub fn inner(&self) -> &Client {
        &self.inner
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips the query string so `?key=` secrets never reach the logs.
fn redact_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

// ============================================================================
// Response Extensions
// ============================================================================

/// Extension trait for Response handling.
pub trait ResponseExt {
    /// Check if the response indicates rate limiting.
    fn is_rate_limited(&self) -> bool;

    /// Get the Retry-After header value in seconds.
    fn retry_after_secs(&self) -> Option<u64>;
}

impl ResponseExt for Response {
    fn is_rate_limited(&self) -> bool {
        self.status() == StatusCode::TOO_MANY_REQUESTS
    }

    fn retry_after_secs(&self) -> Option<u64> {
        self.headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }
}

// ============================================================================
// Status Classification
// ============================================================================

/// Passes successful responses through and classifies the rest.
///
/// # Errors
///
/// Returns the [`FetchError`] matching the status code.
pub async fn check_response(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response.retry_after_secs();
    let body = response.text().await.unwrap_or_default();
    let err = classify_status(status, retry_after, &body);
    warn!(status = status.as_u16(), error = %err, "Provider returned error status");
    Err(err)
}

/// Maps a non-success status and body to a [`FetchError`].
pub fn classify_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> FetchError {
    let message = error_message_from_body(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });

    match status {
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited { retry_after },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FetchError::AuthenticationFailed(message)
        }
        StatusCode::BAD_REQUEST if mentions_api_key(&message) => {
            FetchError::AuthenticationFailed(message)
        }
        StatusCode::BAD_REQUEST => FetchError::BadRequest(message),
        s if s.is_server_error() => FetchError::ServerError {
            status: s.as_u16(),
            message,
        },
        s => FetchError::UnexpectedStatus {
            status: s.as_u16(),
            message,
        },
    }
}

fn mentions_api_key(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("api key") || lower.contains("api_key") || lower.contains("apikey")
}

/// Extracts `error.message` (or a bare `error` string) from a JSON body.
pub fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| error.as_str())
        .map(str::to_string)
        .filter(|m| !m.trim().is_empty())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_allowlist() {
        let client = HttpClient::with_allowed_domains(vec![
            "api.anthropic.com".to_string(),
            "openai.com".to_string(),
        ]);

        assert!(client.is_domain_allowed("https://api.anthropic.com/v1/messages").is_ok());
        assert!(client.is_domain_allowed("https://api.openai.com/v1/chat/completions").is_ok());
        assert!(client.is_domain_allowed("https://evil.com/steal").is_err());
    }

    #[test]
    fn test_no_domain_restrictions() {
        let client = HttpClient::new();
        assert!(client.is_domain_allowed("https://any.domain.com").is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let client = HttpClient::with_allowed_domains(vec!["example.com".to_string()]);
        assert!(matches!(
            client.is_domain_allowed("not-a-valid-url"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_redact_query() {
        assert_eq!(
            redact_query("https://x.test/v1/models/m:generateContent?key=secret"),
            "https://x.test/v1/models/m:generateContent"
        );
        assert_eq!(redact_query("https://x.test/a"), "https://x.test/a");
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, Some(3), ""),
            FetchError::RateLimited { retry_after: Some(3) }
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, None, ""),
            FetchError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            classify_status(
                StatusCode::BAD_REQUEST,
                None,
                r#"{"error":{"message":"API key not valid. Please pass a valid API key."}}"#
            ),
            FetchError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, None, r#"{"error":{"message":"bad model"}}"#),
            FetchError::BadRequest(m) if m == "bad model"
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, None, "<html>"),
            FetchError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, None, ""),
            FetchError::UnexpectedStatus { status: 404, .. }
        ));
    }

    #[test]
    fn test_error_message_from_body() {
        assert_eq!(
            error_message_from_body(r#"{"error":{"message":"nope"}}"#).as_deref(),
            Some("nope")
        );
        assert_eq!(
            error_message_from_body(r#"{"error":"flat"}"#).as_deref(),
            Some("flat")
        );
        assert_eq!(error_message_from_body("not json"), None);
    }
}
