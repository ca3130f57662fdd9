//! OpenRouter provider.
//!
//! OpenRouter speaks the chat-completions dialect and asks callers to
//! identify themselves with referer and title headers.

use std::sync::Arc;
use xreply_core::ProviderKind;
use xreply_fetch::ProviderAdapter;

use crate::chat::ChatCompletionAdapter;
use crate::descriptor::{ProviderDescriptor, StorageKeys};

/// OpenRouter API base URL.
pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Model used when none is selected.
pub const OPENROUTER_DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3.1:free";

/// Creates the OpenRouter adapter.
pub fn openrouter_adapter(base_url: &str) -> ChatCompletionAdapter {
    ChatCompletionAdapter::new(ProviderKind::OpenRouter, base_url, OPENROUTER_DEFAULT_MODEL)
        .with_header("http-referer", "https://x.com")
        .with_header("x-title", "X Auto Reply Assistant")
}

/// Creates the OpenRouter provider descriptor.
pub fn openrouter_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::OpenRouter,
        host: "openrouter.ai",
        base_url: OPENROUTER_API_BASE,
        default_model: OPENROUTER_DEFAULT_MODEL,
        storage: StorageKeys {
            api_key: "openRouterKey",
            model: Some("openRouterModel"),
            custom_model: Some("openRouterCustomModelName"),
        },
        key_prefix: Some("sk-or-"),
        build_adapter: build_openrouter_adapter,
    }
}

fn build_openrouter_adapter(base_url: &str) -> Arc<dyn ProviderAdapter> {
    Arc::new(openrouter_adapter(base_url))
}
