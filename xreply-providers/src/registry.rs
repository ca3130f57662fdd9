//! Provider registry for managing all provider descriptors.
//!
//! The registry provides static access to all provider configurations
//! and is the central point for resolving an adapter by [`ProviderKind`].

use std::sync::{Arc, OnceLock};
use xreply_core::ProviderKind;
use xreply_fetch::ProviderAdapter;

use crate::claude::claude_descriptor;
use crate::deepseek::deepseek_descriptor;
use crate::descriptor::ProviderDescriptor;
use crate::gemini::gemini_descriptor;
use crate::openai::openai_descriptor;
use crate::openrouter::openrouter_descriptor;

// ============================================================================
// Static Registry
// ============================================================================

/// Static storage for all provider descriptors.
static DESCRIPTORS: OnceLock<Vec<ProviderDescriptor>> = OnceLock::new();

/// Initializes all provider descriptors in settings-menu order.
fn init_descriptors() -> Vec<ProviderDescriptor> {
    vec![
        gemini_descriptor(),
        openrouter_descriptor(),
        openai_descriptor(),
        deepseek_descriptor(),
        claude_descriptor(),
    ]
}

// ============================================================================
// Provider Registry
// ============================================================================

/// Global registry of all provider descriptors.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Returns all provider descriptors.
    pub fn all() -> &'static [ProviderDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Gets a provider descriptor by kind.
    pub fn get(id: ProviderKind) -> Option<&'static ProviderDescriptor> {
        Self::all().iter().find(|d| d.id == id)
    }

    /// Looks up a provider by its settings identifier.
    pub fn get_by_id(id: &str) -> Option<&'static ProviderDescriptor> {
        let kind: ProviderKind = id.parse().ok()?;
        Self::get(kind)
    }

    /// Builds the production adapter for a provider.
    pub fn adapter(kind: ProviderKind) -> Option<Arc<dyn ProviderAdapter>> {
        Self::get(kind).map(ProviderDescriptor::adapter)
    }

    /// Returns the hosts API keys may be sent to.
    pub fn allowed_domains() -> Vec<String> {
        Self::all().iter().map(|d| d.host.to_string()).collect()
    }

    /// Returns the number of registered providers.
    pub fn count() -> usize {
        Self::all().len()
    }
}

// ============================================================================
// Tests
// ============================================================================
