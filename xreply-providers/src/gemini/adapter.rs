//! Gemini adapter.

use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;
use xreply_core::ProviderKind;
use xreply_fetch::{CompletionRequest, FetchContext, FetchError, ProviderAdapter};

use super::api::{GeminiRequest, GeminiResponse};
use crate::chat::{decode_body, require_text};

/// Gemini API base URL (Generative Language API).
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is selected.
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Adapter for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    base_url: String,
}

impl Default for GeminiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl GeminiAdapter {
    /// Creates an adapter for the production endpoint.
    pub fn new() -> Self {
        Self {
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Overrides the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builds the endpoint URL with the key as a query parameter.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the base URL is malformed.
    pub fn endpoint(&self, model: &str, api_key: &str) -> Result<Url, FetchError> {
        let raw = format!(
            "{}/v1beta/models/{model}:generateContent",
            self.base_url.trim_end_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn default_model(&self) -> &str {
        GEMINI_DEFAULT_MODEL
    }

    #[instrument(skip(self, ctx, request), fields(model = %request.model))]
    async fn complete(
        &self,
        ctx: &FetchContext,
        request: CompletionRequest<'_>,
    ) -> Result<String, FetchError> {
        let url = self.endpoint(request.model, request.api_key)?;
        let body = GeminiRequest::new(request.prompt, request.params);

        let response = ctx.http.post_json(url.as_str(), &body).await?;
        let parsed: GeminiResponse = decode_body(ProviderKind::Gemini, response).await?;

        debug!(candidates = parsed.candidates.len(), "Gemini response received");
        require_text(ProviderKind::Gemini, parsed.first_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_key() {
        let url = GeminiAdapter::new()
            .endpoint(GEMINI_DEFAULT_MODEL, "abc&def")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key=abc%26def"
        );
    }
}
