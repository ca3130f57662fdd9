//! Provider adapter contract.
//!
//! An adapter maps one prompt to one provider-specific request, performs a
//! single network call, and extracts the first candidate's text. Retries
//! and timeouts are handled by [`crate::client::GenerationClient`].

use async_trait::async_trait;
use xreply_core::ProviderKind;

use crate::context::FetchContext;
use crate::error::FetchError;

/// Fixed generation parameters.
///
/// Output is capped to keep replies short and cheap; these are not user
/// settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Sampling temperature.
    pub temperature: f64,
    /// Nucleus sampling mass.
    pub top_p: f64,
    /// Top-k cutoff, for providers that accept it.
    pub top_k: u32,
    /// Output token cap.
    pub max_output_tokens: u32,
}

impl SamplingParams {
    /// Standard parameters for every provider.
    pub const STANDARD: Self = Self {
        temperature: 0.8,
        top_p: 0.95,
        top_k: 40,
        max_output_tokens: 150,
    };
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// One completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// Prompt text.
    pub prompt: &'a str,
    /// Provider API key.
    pub api_key: &'a str,
    /// Resolved model id.
    pub model: &'a str,
    /// Sampling parameters.
    pub params: SamplingParams,
}

/// A single provider's request/response mapping.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// The provider this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Model used when none is selected.
    fn default_model(&self) -> &str;

    /// Performs exactly one network call and returns the raw reply text.
    ///
    /// Implementations return [`FetchError::MalformedResponse`] when the
    /// expected field path is missing and [`FetchError::EmptyResponse`]
    /// when it holds only whitespace.
    async fn complete(
        &self,
        ctx: &FetchContext,
        request: CompletionRequest<'_>,
    ) -> Result<String, FetchError>;
}
