//! Chat-completions adapter shared by OpenAI-compatible providers.
//!
//! OpenRouter, OpenAI and DeepSeek accept the same request body and return
//! the same envelope; they differ only in base URL, default model, and a
//! few extra headers.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use xreply_core::ProviderKind;
use xreply_fetch::{CompletionRequest, FetchContext, FetchError, ProviderAdapter, check_response};

// ============================================================================
// Wire Types
// ============================================================================

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// `user`, `assistant` or `system`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    /// Model id.
    pub model: &'a str,
    /// Conversation.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Output token cap.
    pub max_tokens: u32,
    /// Nucleus sampling mass.
    pub top_p: f64,
}

impl<'a> ChatRequest<'a> {
    /// Builds the body for one prompt.
    pub fn from_completion(request: &CompletionRequest<'a>) -> Self {
        Self {
            model: request.model,
            messages: vec![ChatMessage::user(request.prompt)],
            temperature: request.params.temperature,
            max_tokens: request.params.max_output_tokens,
            top_p: request.params.top_p,
        }
    }
}

/// Chat-completions response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct ChatResponse {
    /// Candidates.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One candidate.
#[derive(Debug, Default, Deserialize)]
pub struct ChatChoice {
    /// The generated message.
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
}

/// The generated message of a candidate.
#[derive(Debug, Default, Deserialize)]
pub struct ChatChoiceMessage {
    /// Text content.
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Returns `choices[0].message.content`.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// Builds a header value from a secret, rejecting malformed keys locally.
pub(crate) fn secret_header(kind: ProviderKind, value: &str) -> Result<HeaderValue, FetchError> {
    let mut header = HeaderValue::from_str(value).map_err(|_| {
        FetchError::AuthenticationFailed(format!(
            "{} API key contains invalid characters",
            kind.display_name()
        ))
    })?;
    header.set_sensitive(true);
    Ok(header)
}

/// Reads and decodes a successful response body.
pub(crate) async fn decode_body<T: DeserializeOwned>(
    kind: ProviderKind,
    response: reqwest::Response,
) -> Result<T, FetchError> {
    let response = check_response(response).await?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| FetchError::from_decode(kind, e))
}

/// Validates extracted text.
pub(crate) fn require_text(kind: ProviderKind, text: Option<&str>) -> Result<String, FetchError> {
    let text = text.ok_or_else(|| FetchError::MalformedResponse(kind.display_name().to_string()))?;
    let text = text.trim();
    if text.is_empty() {
        return Err(FetchError::EmptyResponse(kind.display_name().to_string()));
    }
    Ok(text.to_string())
}

// ============================================================================
// Adapter
// ============================================================================

/// Adapter for a chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionAdapter {
    kind: ProviderKind,
    base_url: String,
    default_model: String,
    extra_headers: Vec<(HeaderName, HeaderValue)>,
}

impl ChatCompletionAdapter {
    /// Creates an adapter for `{base_url}/chat/completions`.
    pub fn new(kind: ProviderKind, base_url: impl Into<String>, default_model: impl Into<String>) -> Self {
        Self {
            kind,
            base_url: base_url.into(),
            default_model: default_model.into(),
            extra_headers: Vec::new(),
        }
    }

    /// Adds a fixed header sent with every request.
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.extra_headers.push((
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ));
        self
    }

    /// Overrides the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the full endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, secret_header(self.kind, &format!("Bearer {api_key}"))?);
        for (name, value) in &self.extra_headers {
            headers.insert(name.clone(), value.clone());
        }
        Ok(headers)
    }
}

#[async_trait]
impl ProviderAdapter for ChatCompletionAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    #[instrument(skip(self, ctx, request), fields(provider = %self.kind, model = %request.model))]
    async fn complete(
        &self,
        ctx: &FetchContext,
        request: CompletionRequest<'_>,
    ) -> Result<String, FetchError> {
        let headers = self.headers(request.api_key)?;
        let body = ChatRequest::from_completion(&request);

        let response = ctx
            .http
            .post_json_with_headers(&self.endpoint(), headers, &body)
            .await?;
        let parsed: ChatResponse = decode_body(self.kind, response).await?;

        debug!(choices = parsed.choices.len(), "Chat completion received");
        require_text(self.kind, parsed.first_text())
    }
}
