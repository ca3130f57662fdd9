//! Privileged request handling.
//!
//! The background owns the network: it re-reads settings for every
//! generation so a provider switch applies immediately, calls the provider
//! through the retrying client, and post-processes the text before it
//! crosses back to the page.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use xreply_core::{
    GENERATION_FAILED_MESSAGE, GenerationRequest, GenerationResult, PostProcessOptions,
    ProviderKind, ReplyError, ReplyPostProcessor,
};
use xreply_fetch::{FetchContext, FetchSettings, GenerationClient, HttpClient, ProviderAdapter};
use xreply_providers::ProviderRegistry;
use xreply_store::{Settings, SettingsStore};

use crate::error::BridgeError;
use crate::port::PortListener;
use crate::prompts::reply_prompt;
use crate::protocol::{Request, Response};

/// Why the extension lifecycle hook fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallReason {
    /// First install: write defaults.
    Install,
    /// Version update: merge defaults under stored values.
    Update,
}

// ============================================================================
// Background Service
// ============================================================================

/// Answers requests from page contexts.
pub struct BackgroundService {
    store: Arc<SettingsStore>,
    ctx: FetchContext,
    base_url: Option<String>,
    processor: ReplyPostProcessor,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for BackgroundService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundService")
            .field("settings", &self.store.path())
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl BackgroundService {
    /// Creates a service that only sends keys to the known provider hosts.
    pub fn new(store: Arc<SettingsStore>) -> Self {
        let http = HttpClient::with_allowed_domains(ProviderRegistry::allowed_domains());
        Self {
            store,
            ctx: FetchContext::new().with_http(http),
            base_url: None,
            processor: ReplyPostProcessor::new(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replaces the fetch context.
    pub fn with_fetch_context(mut self, ctx: FetchContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Replaces timeout and retry settings, keeping the HTTP client.
    pub fn with_fetch_settings(mut self, settings: FetchSettings) -> Self {
        self.ctx = self.ctx.with_settings(settings);
        self
    }

    /// Points every adapter at `base_url` instead of the production host.
    ///
    /// The production host allowlist no longer applies, so the fetch
    /// context is reset to an unrestricted one.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self.ctx = self.ctx.with_http(HttpClient::new());
        self
    }

    /// Replaces the post-processor.
    pub fn with_processor(mut self, processor: ReplyPostProcessor) -> Self {
        self.processor = processor;
        self
    }

    /// Replaces the randomness used for humanization.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Returns the settings store.
    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    fn adapter_for(&self, kind: ProviderKind) -> Option<Arc<dyn ProviderAdapter>> {
        let descriptor = ProviderRegistry::get(kind)?;
        Some(match &self.base_url {
            Some(base) => descriptor.adapter_at(base),
            None => descriptor.adapter(),
        })
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Runs the install or update hook.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings record cannot be written.
    pub async fn on_installed(&self, reason: InstallReason) -> Result<Settings, BridgeError> {
        let settings = match reason {
            InstallReason::Install => self.store.install().await?,
            InstallReason::Update => self.store.upgrade().await?,
        };
        info!(?reason, provider = %settings.provider, "Lifecycle hook complete");
        Ok(settings)
    }

    // ========================================================================
    // Request Handling
    // ========================================================================

    /// Serves requests until every page-side port is dropped.
    pub async fn serve(self: Arc<Self>, mut listener: PortListener) {
        info!("Background listening");
        while let Some(message) = listener.recv().await {
            let service = Arc::clone(&self);
            tokio::spawn(async move {
                let response = service.handle(&message.request).await;
                message.respond(response);
            });
        }
        debug!("All ports closed");
    }

    /// Answers one request. Failures become failure responses.
    #[instrument(skip(self, request), fields(action = request.action()))]
    pub async fn handle(&self, request: &Request) -> Response {
        match request {
            Request::GenerateReply { tweet_content } => {
                if tweet_content.is_empty() {
                    return Response::failure(&ReplyError::InvalidRequest(
                        "Invalid tweet content".to_string(),
                    ));
                }
                let generation = GenerationRequest::Reply(tweet_content.clone());
                match self.generate(&generation).await {
                    Ok(result) => Response::reply(result.text),
                    Err(err) => Self::failed(&err),
                }
            }
            Request::GenerateTweet { prompt } => {
                if prompt.trim().is_empty() {
                    return Response::failure(&ReplyError::InvalidRequest(
                        "Empty prompt".to_string(),
                    ));
                }
                let generation = GenerationRequest::Tweet(prompt.clone());
                match self.generate(&generation).await {
                    Ok(result) => Response::tweet(result.text),
                    Err(err) => Self::failed(&err),
                }
            }
            Request::RecordStats { stats_action, data } => {
                info!(stats_action = %stats_action, data = %data, "Stats recorded");
                Response::ack()
            }
            Request::SettingsUpdated { settings } => {
                debug!(provider = %settings.provider, "Settings broadcast seen");
                Response::ack()
            }
            Request::OpenPopup => Response::ack(),
        }
    }

    fn failed(err: &ReplyError) -> Response {
        warn!(kind = ?err.kind(), error = %err, "Generation failed");
        Response::failure(err)
    }

    /// Produces post-processed text for a request.
    ///
    /// # Errors
    ///
    /// Returns [`ReplyError::Configuration`] when the extension is disabled
    /// or the active provider has no key, and provider errors after retry
    /// handling.
    #[instrument(skip(self, request), fields(kind = request.kind().as_str()))]
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ReplyError> {
        let settings = self
            .store
            .read_fresh()
            .await
            .map_err(BridgeError::from)?;
        if !settings.enabled {
            return Err(ReplyError::Configuration(
                "Auto Reply is disabled. Enable it in extension settings.".to_string(),
            ));
        }

        let provider = settings.provider;
        if !settings.has_active_key() {
            return Err(ReplyError::missing_key(provider));
        }
        let adapter = self.adapter_for(provider).ok_or_else(|| {
            ReplyError::Configuration(format!("Unsupported provider: {provider}"))
        })?;

        let prompt = match request {
            GenerationRequest::Reply(tweet) => reply_prompt(tweet, &settings),
            GenerationRequest::Tweet(prompt) => prompt.clone(),
        };

        let model = settings.active_model();
        let completion = GenerationClient::new(adapter, self.ctx.clone())
            .complete(&prompt, settings.active_api_key(), model.as_deref())
            .await?;

        let options = PostProcessOptions::default().with_default_text(settings.default_text.clone());
        let text = {
            let mut rng = self.rng.lock().await;
            self.processor.process(&completion.text, &options, &mut *rng)
        };
        if text.trim().is_empty() {
            return Err(ReplyError::Provider {
                message: GENERATION_FAILED_MESSAGE.to_string(),
                retryable: false,
            });
        }

        info!(
            provider = %provider,
            model = %completion.model,
            attempts = completion.attempts,
            "Generated {}",
            request.kind().as_str()
        );
        Ok(GenerationResult {
            kind: request.kind(),
            text,
            provider,
            model: completion.model,
        })
    }
}
