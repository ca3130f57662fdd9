//! Provider-related types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Provider Kind
// ============================================================================

/// Supported language-model services.
///
/// Serialized with the identifiers used in the persisted settings record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini
    #[default]
    Gemini,
    /// OpenRouter (multi-model gateway)
    OpenRouter,
    /// OpenAI
    OpenAI,
    /// DeepSeek
    DeepSeek,
    /// Anthropic Claude
    Claude,
}

impl ProviderKind {
    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenRouter => "OpenRouter",
            Self::OpenAI => "OpenAI",
            Self::DeepSeek => "DeepSeek",
            Self::Claude => "Claude",
        }
    }

    /// Returns the identifier used in settings and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenRouter => "openrouter",
            Self::OpenAI => "openai",
            Self::DeepSeek => "deepseek",
            Self::Claude => "claude",
        }
    }

    /// Returns all supported providers.
    pub fn all() -> &'static [ProviderKind] {
        &[
            Self::Gemini,
            Self::OpenRouter,
            Self::OpenAI,
            Self::DeepSeek,
            Self::Claude,
        ]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.id() == needle)
            .ok_or_else(|| CoreError::UnknownProvider(s.to_string()))
    }
}
