//! Gemini provider descriptor.

use std::sync::Arc;
use xreply_core::ProviderKind;
use xreply_fetch::ProviderAdapter;

use super::adapter::{GEMINI_API_BASE, GEMINI_DEFAULT_MODEL, GeminiAdapter};
use crate::descriptor::{ProviderDescriptor, StorageKeys};

/// Creates the Gemini provider descriptor.
pub fn gemini_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::Gemini,
        host: "generativelanguage.googleapis.com",
        base_url: GEMINI_API_BASE,
        default_model: GEMINI_DEFAULT_MODEL,
        storage: StorageKeys {
            api_key: "geminiKey",
            model: None,
            custom_model: None,
        },
        key_prefix: None,
        build_adapter: build_gemini_adapter,
    }
}

fn build_gemini_adapter(base_url: &str) -> Arc<dyn ProviderAdapter> {
    Arc::new(GeminiAdapter::new().with_base_url(base_url))
}
