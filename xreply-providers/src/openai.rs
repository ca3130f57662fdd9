//! OpenAI provider.

use std::sync::Arc;
use xreply_core::ProviderKind;
use xreply_fetch::ProviderAdapter;

use crate::chat::ChatCompletionAdapter;
use crate::descriptor::{ProviderDescriptor, StorageKeys};

/// OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Model used when none is selected.
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";

/// Creates the OpenAI adapter.
pub fn openai_adapter(base_url: &str) -> ChatCompletionAdapter {
    ChatCompletionAdapter::new(ProviderKind::OpenAI, base_url, OPENAI_DEFAULT_MODEL)
}

/// Creates the OpenAI provider descriptor.
pub fn openai_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::OpenAI,
        host: "api.openai.com",
        base_url: OPENAI_API_BASE,
        default_model: OPENAI_DEFAULT_MODEL,
        storage: StorageKeys {
            api_key: "openaiKey",
            model: Some("openaiModel"),
            custom_model: Some("openaiCustomModelName"),
        },
        key_prefix: Some("sk-"),
        build_adapter: build_openai_adapter,
    }
}

fn build_openai_adapter(base_url: &str) -> Arc<dyn ProviderAdapter> {
    Arc::new(openai_adapter(base_url))
}
