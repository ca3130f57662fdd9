// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # xreply Providers
//!
//! Concrete [`ProviderAdapter`](xreply_fetch::ProviderAdapter)s for each
//! supported language-model service, plus a static registry.
//!
//! ## Supported Providers
//!
//! | Provider | Request shape | Auth |
//! |----------|---------------|------|
//! | Gemini | single content part | `?key=` query |
//! | OpenRouter | chat completions | Bearer + referer/title headers |
//! | OpenAI | chat completions | Bearer |
//! | DeepSeek | chat completions | Bearer |
//! | Claude | messages | `x-api-key` + version header |
//!
//! ## Usage
//!
//! ```ignore
//! use xreply_core::ProviderKind;
//! use xreply_fetch::{FetchContext, GenerationClient};
//! use xreply_providers::ProviderRegistry;
//!
//! let adapter = ProviderRegistry::adapter(ProviderKind::Claude).unwrap();
//! let client = GenerationClient::new(adapter, FetchContext::new());
//! let reply = client.generate(&prompt, &key, Some("claude-opus-4-20250514")).await?;
//! ```

pub mod chat;
pub mod descriptor;
pub mod registry;

// Provider modules (alphabetical)
pub mod claude;
pub mod deepseek;
pub mod gemini;
pub mod openai;
pub mod openrouter;

pub use chat::ChatCompletionAdapter;
pub use claude::{ClaudeAdapter, claude_descriptor};
pub use deepseek::{deepseek_adapter, deepseek_descriptor};
pub use descriptor::{ProviderDescriptor, StorageKeys};
pub use gemini::{GeminiAdapter, gemini_descriptor};
pub use openai::{openai_adapter, openai_descriptor};
pub use openrouter::{openrouter_adapter, openrouter_descriptor};
pub use registry::ProviderRegistry;
