//! Generation client: one adapter wrapped in retry control.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::adapter::{CompletionRequest, ProviderAdapter, SamplingParams};
use crate::context::FetchContext;
use crate::error::FetchError;

/// Text returned by a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Raw reply text, trimmed.
    pub text: String,
    /// Model that was asked.
    pub model: String,
    /// Network calls made.
    pub attempts: u32,
}

/// Calls a provider with retries and a per-attempt timeout.
#[derive(Clone)]
pub struct GenerationClient {
    adapter: Arc<dyn ProviderAdapter>,
    ctx: FetchContext,
    params: SamplingParams,
}

impl GenerationClient {
    /// Creates a client for an adapter.
    pub fn new(adapter: Arc<dyn ProviderAdapter>, ctx: FetchContext) -> Self {
        Self {
            adapter,
            ctx,
            params: SamplingParams::STANDARD,
        }
    }

    /// Returns the adapter.
    pub fn adapter(&self) -> &dyn ProviderAdapter {
        self.adapter.as_ref()
    }

    /// Generates text for `prompt`.
    ///
    /// # Errors
    ///
    /// See [`GenerationClient::complete`].
    pub async fn generate(
        &self,
        prompt: &str,
        api_key: &str,
        model: Option<&str>,
    ) -> Result<String, FetchError> {
        self.complete(prompt, api_key, model)
            .await
            .map(|completion| completion.text)
    }

    /// Generates text and reports the model and attempt count.
    ///
    /// A blank `model` falls back to the adapter's default.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingApiKey`] without any network call when
    /// the key is blank, a terminal provider error on the first terminal
    /// failure, or [`FetchError::RetriesExhausted`].
    #[instrument(skip(self, prompt, api_key), fields(provider = %self.adapter.kind()))]
    pub async fn complete(
        &self,
        prompt: &str,
        api_key: &str,
        model: Option<&str>,
    ) -> Result<Completion, FetchError> {
        let kind = self.adapter.kind();
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(FetchError::MissingApiKey(kind));
        }

        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.adapter.default_model())
            .to_string();

        let request = CompletionRequest {
            prompt,
            api_key,
            model: &model,
            params: self.params,
        };

        let (text, attempts) = self
            .ctx
            .retry_controller()
            .run(|_| self.adapter.complete(&self.ctx, request))
            .await?;

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(FetchError::EmptyResponse(kind.display_name().to_string()));
        }

        info!(model = %model, attempts, "Generation complete");
        Ok(Completion {
            text,
            model,
            attempts,
        })
    }
}
