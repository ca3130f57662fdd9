//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use xreply_composer::{InsertionAttempt, VerifiedVia};
use xreply_core::GenerationResult;
use xreply_providers::ProviderRegistry;
use xreply_store::Settings;

use super::mask_key;

// ============================================================================
// Output Types
// ============================================================================

/// A generated reply or tweet.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    pub kind: String,
    pub text: String,
    pub provider: String,
    pub model: String,
    pub chars: usize,
}

impl From<&GenerationResult> for GenerationOutput {
    fn from(result: &GenerationResult) -> Self {
        Self {
            kind: result.kind.as_str().to_string(),
            text: result.text.clone(),
            provider: result.provider.id().to_string(),
            model: result.model.clone(),
            chars: xreply_core::twitter_char_count(&result.text),
        }
    }
}

/// Character count report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountOutput {
    pub chars: usize,
    pub limit: usize,
    pub remaining: i64,
    pub within_limit: bool,
    pub language: String,
    pub tweet_type: String,
    pub mentions: Vec<String>,
    pub hashtags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trimmed: Option<String>,
}

/// Provider info output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfoOutput {
    pub id: String,
    pub display_name: String,
    pub host: String,
    pub key_field: String,
    pub model: String,
    pub configured: bool,
    pub active: bool,
}

/// One insertion strategy attempt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutput {
    pub strategy: String,
    pub handled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_via: Option<VerifiedVia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl From<&InsertionAttempt> for AttemptOutput {
    fn from(attempt: &InsertionAttempt) -> Self {
        Self {
            strategy: attempt.strategy_id.clone(),
            handled: attempt.handled,
            verified_via: attempt.verified,
            error: attempt.error.clone(),
            duration_ms: u64::try_from(attempt.duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Result of a simulated insertion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutput {
    pub accept: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub attempts: Vec<AttemptOutput>,
    pub composer_text: String,
    pub clipboard: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let output = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(output)
    }

    /// Formats settings with every API key masked.
    pub fn format_settings(&self, settings: &Settings) -> Result<String> {
        let mut value = serde_json::to_value(settings)?;
        if let Value::Object(map) = &mut value {
            for desc in ProviderRegistry::all() {
                if let Some(Value::String(key)) = map.get_mut(desc.storage.api_key) {
                    *key = mask_key(key);
                }
            }
        }
        self.format(&value)
    }
}
