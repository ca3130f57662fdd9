//! Claude provider descriptor.

use std::sync::Arc;
use xreply_core::ProviderKind;
use xreply_fetch::ProviderAdapter;

use super::adapter::{CLAUDE_API_BASE, CLAUDE_DEFAULT_MODEL, ClaudeAdapter};
use crate::descriptor::{ProviderDescriptor, StorageKeys};

/// Creates the Claude provider descriptor.
pub fn claude_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::Claude,
        host: "api.anthropic.com",
        base_url: CLAUDE_API_BASE,
        default_model: CLAUDE_DEFAULT_MODEL,
        storage: StorageKeys {
            api_key: "claudeKey",
            model: Some("claudeModel"),
            custom_model: Some("claudeCustomModelName"),
        },
        key_prefix: Some("sk-ant-"),
        build_adapter: build_claude_adapter,
    }
}

fn build_claude_adapter(base_url: &str) -> Arc<dyn ProviderAdapter> {
    Arc::new(ClaudeAdapter::new().with_base_url(base_url))
}
