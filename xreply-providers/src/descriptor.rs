//! Provider descriptor system.
//!
//! A descriptor contains the static configuration for a provider:
//! - Host and base URL
//! - Default model
//! - Settings record keys for the API key and model selection
//! - Adapter construction

use std::sync::Arc;
use xreply_core::ProviderKind;
use xreply_fetch::ProviderAdapter;

/// Minimum plausible API key length.
const MIN_KEY_LEN: usize = 10;

// ============================================================================
// Provider Descriptor
// ============================================================================

/// Complete descriptor for a provider.
pub struct ProviderDescriptor {
    /// Provider identifier.
    pub id: ProviderKind,
    /// Host that receives this provider's API key.
    pub host: &'static str,
    /// Production base URL.
    pub base_url: &'static str,
    /// Model used when the settings select none.
    pub default_model: &'static str,
    /// Settings record keys.
    pub storage: StorageKeys,
    /// Expected key prefix, if the provider uses one.
    pub key_prefix: Option<&'static str>,
    /// Builds the adapter against a base URL.
    pub build_adapter: fn(&str) -> Arc<dyn ProviderAdapter>,
}

impl ProviderDescriptor {
    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        self.id.display_name()
    }

    /// Returns the identifier used in settings.
    pub fn cli_name(&self) -> &'static str {
        self.id.id()
    }

    /// Builds the adapter for the production endpoint.
    pub fn adapter(&self) -> Arc<dyn ProviderAdapter> {
        (self.build_adapter)(self.base_url)
    }

    /// Builds the adapter against another base URL.
    pub fn adapter_at(&self, base_url: &str) -> Arc<dyn ProviderAdapter> {
        (self.build_adapter)(base_url)
    }

    /// Returns true if `key` has a plausible format for this provider.
    ///
    /// This is a hint for settings screens; the provider has the final say.
    pub fn looks_like_key(&self, key: &str) -> bool {
        let key = key.trim();
        key.len() >= MIN_KEY_LEN && self.key_prefix.is_none_or(|prefix| key.starts_with(prefix))
    }
}

impl std::fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("id", &self.id)
            .field("host", &self.host)
            .field("default_model", &self.default_model)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Storage Keys
// ============================================================================

/// Names of the settings fields that belong to a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageKeys {
    /// API key field.
    pub api_key: &'static str,
    /// Model selection field, if the model is selectable.
    pub model: Option<&'static str>,
    /// Custom model name field, used when the model is `custom`.
    pub custom_model: Option<&'static str>,
}

#[cfg(test)]
mod tests {
    use crate::registry::ProviderRegistry;
    use xreply_core::ProviderKind;

    #[test]
    fn test_key_hints() {
        let claude = ProviderRegistry::get(ProviderKind::Claude).unwrap();
        assert!(claude.looks_like_key("sk-ant-api03-abcdef"));
        assert!(!claude.looks_like_key("sk-abcdefghijk"));

        let openrouter = ProviderRegistry::get(ProviderKind::OpenRouter).unwrap();
        assert!(openrouter.looks_like_key("sk-or-v1-0123456789"));
        assert!(!openrouter.looks_like_key("sk-or-1"));

        let gemini = ProviderRegistry::get(ProviderKind::Gemini).unwrap();
        assert!(gemini.looks_like_key("AIzaSyA-anything"));
        assert!(!gemini.looks_like_key("short"));
    }
}
