//! Claude adapter.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument};
use xreply_core::ProviderKind;
use xreply_fetch::{CompletionRequest, FetchContext, FetchError, ProviderAdapter};

use super::api::{ClaudeRequest, ClaudeResponse};
use crate::chat::{decode_body, require_text, secret_header};

/// Anthropic API base URL.
pub const CLAUDE_API_BASE: &str = "https://api.anthropic.com";

/// API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Model used when none is selected.
pub const CLAUDE_DEFAULT_MODEL: &str = "claude-opus-4-20250514";

/// Adapter for the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct ClaudeAdapter {
    base_url: String,
}

impl Default for ClaudeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaudeAdapter {
    /// Creates an adapter for the production endpoint.
    pub fn new() -> Self {
        Self {
            base_url: CLAUDE_API_BASE.to_string(),
        }
    }

    /// Overrides the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the full endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }

    fn headers(api_key: &str) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-api-key"),
            secret_header(ProviderKind::Claude, api_key)?,
        );
        headers.insert(
            HeaderName::from_static("anthropic-version"),
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        Ok(headers)
    }
}

#[async_trait]
impl ProviderAdapter for ClaudeAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    fn default_model(&self) -> &str {
        CLAUDE_DEFAULT_MODEL
    }

    #[instrument(skip(self, ctx, request), fields(model = %request.model))]
    async fn complete(
        &self,
        ctx: &FetchContext,
        request: CompletionRequest<'_>,
    ) -> Result<String, FetchError> {
        let headers = Self::headers(request.api_key)?;
        let body = ClaudeRequest::from_completion(&request);

        let response = ctx
            .http
            .post_json_with_headers(&self.endpoint(), headers, &body)
            .await?;
        let parsed: ClaudeResponse = decode_body(ProviderKind::Claude, response).await?;

        debug!(
            blocks = parsed.content.len(),
            stop_reason = ?parsed.stop_reason,
            "Claude response received"
        );
        require_text(ProviderKind::Claude, parsed.first_text())
    }
}
