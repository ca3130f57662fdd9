//! DeepSeek provider.

use std::sync::Arc;
use xreply_core::ProviderKind;
use xreply_fetch::ProviderAdapter;

use crate::chat::ChatCompletionAdapter;
use crate::descriptor::{ProviderDescriptor, StorageKeys};

/// DeepSeek API base URL.
pub const DEEPSEEK_API_BASE: &str = "https://api.deepseek.com/v1";

/// Model used when none is selected.
pub const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";

/// Creates the DeepSeek adapter.
pub fn deepseek_adapter(base_url: &str) -> ChatCompletionAdapter {
    ChatCompletionAdapter::new(ProviderKind::DeepSeek, base_url, DEEPSEEK_DEFAULT_MODEL)
}

/// Creates the DeepSeek provider descriptor.
pub fn deepseek_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::DeepSeek,
        host: "api.deepseek.com",
        base_url: DEEPSEEK_API_BASE,
        default_model: DEEPSEEK_DEFAULT_MODEL,
        storage: StorageKeys {
            api_key: "deepseekKey",
            model: Some("deepseekModel"),
            custom_model: None,
        },
        key_prefix: Some("sk-"),
        build_adapter: build_deepseek_adapter,
    }
}

fn build_deepseek_adapter(base_url: &str) -> Arc<dyn ProviderAdapter> {
    Arc::new(deepseek_adapter(base_url))
}
