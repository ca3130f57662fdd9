//! The persisted settings record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use xreply_core::{ProviderKind, TypingDelay};

use crate::error::StoreError;

/// Model value that defers to the provider's custom model name field.
pub const CUSTOM_MODEL: &str = "custom";

// ============================================================================
// Settings
// ============================================================================

/// User preferences, stored as one flat camelCase JSON object.
///
/// Keys this build does not know about are kept in `extra` so a downgrade
/// followed by an upgrade does not lose them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Master switch.
    pub enabled: bool,
    /// Active provider.
    pub provider: ProviderKind,

    // ========================================================================
    // API Keys
    // ========================================================================
    /// Gemini API key.
    pub gemini_key: String,
    /// OpenRouter API key.
    pub open_router_key: String,
    /// OpenAI API key.
    pub openai_key: String,
    /// DeepSeek API key.
    pub deepseek_key: String,
    /// Claude API key.
    pub claude_key: String,

    // ========================================================================
    // Model Selection
    // ========================================================================
    /// OpenRouter model, or `custom`.
    pub open_router_model: String,
    /// OpenRouter model used when the selection is `custom`.
    pub open_router_custom_model_name: String,
    /// OpenAI model, or `custom`.
    pub openai_model: String,
    /// OpenAI model used when the selection is `custom`.
    pub openai_custom_model_name: String,
    /// DeepSeek model.
    pub deepseek_model: String,
    /// Claude model, or `custom`.
    pub claude_model: String,
    /// Claude model used when the selection is `custom`.
    pub claude_custom_model_name: String,

    // ========================================================================
    // Generation Tuning
    // ========================================================================
    /// Lower bound of the reply length, in words.
    pub min_words: u32,
    /// Upper bound of the reply length, in words.
    pub max_words: u32,
    /// Text appended to every reply.
    pub default_text: String,
    /// Whether the reply may contain an emoji.
    pub include_emoji: bool,
    /// Voice of the reply.
    pub tone: Tone,

    // ========================================================================
    // Delivery Pacing
    // ========================================================================
    /// Pause between automated actions.
    pub delay_range: DelayRange,
    /// Simulated typing pace.
    pub typing_speed: TypingSpeed,

    /// Unknown keys from the stored record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: ProviderKind::Gemini,
            gemini_key: String::new(),
            open_router_key: String::new(),
            openai_key: String::new(),
            deepseek_key: String::new(),
            claude_key: String::new(),
            open_router_model: "deepseek/deepseek-chat-v3.1:free".to_string(),
            open_router_custom_model_name: String::new(),
            openai_model: "gpt-4o".to_string(),
            openai_custom_model_name: String::new(),
            deepseek_model: "deepseek-chat".to_string(),
            claude_model: "claude-opus-4-20250514".to_string(),
            claude_custom_model_name: String::new(),
            min_words: 5,
            max_words: 16,
            default_text: String::new(),
            include_emoji: true,
            tone: Tone::Casual,
            delay_range: DelayRange::default(),
            typing_speed: TypingSpeed::Normal,
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Returns the stored key for a provider, untrimmed.
    pub fn api_key_for(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::Gemini => &self.gemini_key,
            ProviderKind::OpenRouter => &self.open_router_key,
            ProviderKind::OpenAI => &self.openai_key,
            ProviderKind::DeepSeek => &self.deepseek_key,
            ProviderKind::Claude => &self.claude_key,
        }
    }

    /// Returns the active provider's key.
    pub fn active_api_key(&self) -> &str {
        self.api_key_for(self.provider)
    }

    /// Returns true if the active provider has a non-blank key.
    pub fn has_active_key(&self) -> bool {
        !self.active_api_key().trim().is_empty()
    }

    /// Sets the key for a provider.
    pub fn set_api_key(&mut self, kind: ProviderKind, key: impl Into<String>) {
        let slot = match kind {
            ProviderKind::Gemini => &mut self.gemini_key,
            ProviderKind::OpenRouter => &mut self.open_router_key,
            ProviderKind::OpenAI => &mut self.openai_key,
            ProviderKind::DeepSeek => &mut self.deepseek_key,
            ProviderKind::Claude => &mut self.claude_key,
        };
        *slot = key.into();
    }

    /// Resolves the model to request from a provider.
    ///
    /// Returns `None` when the provider's default should be used: Gemini has
    /// no selectable model, and a blank selection or a `custom` selection
    /// with a blank custom name falls back too.
    pub fn model_for(&self, kind: ProviderKind) -> Option<String> {
        let (selected, custom) = match kind {
            ProviderKind::Gemini => return None,
            ProviderKind::OpenRouter => (
                &self.open_router_model,
                Some(&self.open_router_custom_model_name),
            ),
            ProviderKind::OpenAI => (&self.openai_model, Some(&self.openai_custom_model_name)),
            ProviderKind::DeepSeek => (&self.deepseek_model, None),
            ProviderKind::Claude => (&self.claude_model, Some(&self.claude_custom_model_name)),
        };

        let model = match custom {
            Some(custom) if selected.trim() == CUSTOM_MODEL => custom,
            _ => selected,
        };
        let model = model.trim();
        (!model.is_empty()).then(|| model.to_string())
    }

    /// Returns the active provider's model.
    pub fn active_model(&self) -> Option<String> {
        self.model_for(self.provider)
    }

    /// Returns the word bounds, ordered.
    pub fn word_range(&self) -> (u32, u32) {
        if self.min_words <= self.max_words {
            (self.min_words, self.max_words)
        } else {
            (self.max_words, self.min_words)
        }
    }
}

// ============================================================================
// Tone
// ============================================================================

/// Voice of a generated reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    /// Relaxed and conversational.
    #[default]
    Casual,
    /// Polished and businesslike.
    Professional,
    /// Playful and witty.
    Humorous,
    /// Courteous and structured.
    Formal,
    /// Executive, results-focused.
    ProPlus,
    /// Precise and analytical.
    Academic,
    /// Sarcastic teasing.
    Troll,
    /// Blunt and dismissive.
    Bully,
    /// Good-natured roasting.
    Roasting,
}

impl Tone {
    /// Returns the stored identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Professional => "professional",
            Self::Humorous => "humorous",
            Self::Formal => "formal",
            Self::ProPlus => "pro-plus",
            Self::Academic => "academic",
            Self::Troll => "troll",
            Self::Bully => "bully",
            Self::Roasting => "roasting",
        }
    }

    /// All tones.
    pub fn all() -> &'static [Tone] {
        &[
            Self::Casual,
            Self::Professional,
            Self::Humorous,
            Self::Formal,
            Self::ProPlus,
            Self::Academic,
            Self::Troll,
            Self::Bully,
            Self::Roasting,
        ]
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tone {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|tone| tone.id() == needle)
            .ok_or_else(|| StoreError::InvalidValue {
                key: "tone".to_string(),
                message: format!("unknown tone '{s}'"),
            })
    }
}

// ============================================================================
// Typing Speed
// ============================================================================

/// Simulated typing pace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypingSpeed {
    /// 100 ms base, 50 ms variance.
    Slow,
    /// 50 ms base, 30 ms variance.
    #[default]
    Normal,
    /// 30 ms base, 20 ms variance.
    Fast,
}

impl TypingSpeed {
    /// Returns the per-character delay.
    pub fn delay(&self) -> TypingDelay {
        match self {
            Self::Slow => TypingDelay::from_millis(100, 50),
            Self::Normal => TypingDelay::from_millis(50, 30),
            Self::Fast => TypingDelay::from_millis(30, 20),
        }
    }
}

impl fmt::Display for TypingSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slow => write!(f, "slow"),
            Self::Normal => write!(f, "normal"),
            Self::Fast => write!(f, "fast"),
        }
    }
}

// ============================================================================
// Delay Range
// ============================================================================

/// A `"min-max"` range of whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DelayRange {
    /// Lower bound in seconds.
    pub min_secs: u64,
    /// Upper bound in seconds.
    pub max_secs: u64,
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min_secs: 3,
            max_secs: 8,
        }
    }
}

impl fmt::Display for DelayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min_secs, self.max_secs)
    }
}

impl FromStr for DelayRange {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StoreError::InvalidValue {
            key: "delayRange".to_string(),
            message: format!("expected \"min-max\" seconds, got '{s}'"),
        };
        let (min, max) = s.trim().split_once('-').ok_or_else(invalid)?;
        let min_secs: u64 = min.trim().parse().map_err(|_| invalid())?;
        let max_secs: u64 = max.trim().parse().map_err(|_| invalid())?;
        if min_secs > max_secs {
            return Err(invalid());
        }
        Ok(Self { min_secs, max_secs })
    }
}

impl TryFrom<String> for DelayRange {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DelayRange> for String {
    fn from(range: DelayRange) -> Self {
        range.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    #[test]
    fn test_storage_keys() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "enabled",
            "provider",
            "geminiKey",
            "openRouterKey",
            "openaiKey",
            "deepseekKey",
            "claudeKey",
            "openRouterModel",
            "openRouterCustomModelName",
            "openaiModel",
            "openaiCustomModelName",
            "deepseekModel",
            "claudeModel",
            "claudeCustomModelName",
            "minWords",
            "maxWords",
            "defaultText",
            "includeEmoji",
            "tone",
            "delayRange",
            "typingSpeed",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj.len(), 21);
        assert_eq!(json["delayRange"], "3-8");
        assert_eq!(json["provider"], "gemini");
    }

    #[test]
    fn test_model_resolution() {
        let mut settings = Settings::default();
        assert_eq!(settings.model_for(ProviderKind::Gemini), None);
        assert_eq!(settings.model_for(ProviderKind::OpenAI).as_deref(), Some("gpt-4o"));

        settings.claude_model = CUSTOM_MODEL.to_string();
        settings.claude_custom_model_name = "claude-sonnet-4-20250514".to_string();
        assert_eq!(
            settings.model_for(ProviderKind::Claude).as_deref(),
            Some("claude-sonnet-4-20250514")
        );

        settings.open_router_model = CUSTOM_MODEL.to_string();
        assert_eq!(settings.model_for(ProviderKind::OpenRouter), None);

        settings.deepseek_model = String::new();
        assert_eq!(settings.model_for(ProviderKind::DeepSeek), None);
    }

    #[test]
    fn test_active_key() {
        let mut settings = Settings::default();
        assert!(!settings.has_active_key());

        settings.provider = ProviderKind::DeepSeek;
        settings.set_api_key(ProviderKind::DeepSeek, "sk-deep");
        assert_eq!(settings.active_api_key(), "sk-deep");
        assert!(settings.has_active_key());

        settings.set_api_key(ProviderKind::DeepSeek, "   ");
        assert!(!settings.has_active_key());
    }

    #[test]
    fn test_tone_serde() {
        assert_eq!(serde_json::to_value(Tone::ProPlus).unwrap(), "pro-plus");
        assert_eq!("PRO-PLUS".parse::<Tone>().unwrap(), Tone::ProPlus);
        assert!("snarky".parse::<Tone>().is_err());
        for tone in Tone::all() {
            let json = serde_json::to_value(tone).unwrap();
            assert_eq!(json, tone.id());
        }
    }

    #[test]
    fn test_delay_range_parse() {
        assert_eq!(
            "2-5".parse::<DelayRange>().unwrap(),
            DelayRange {
                min_secs: 2,
                max_secs: 5
            }
        );
        assert!("5".parse::<DelayRange>().is_err());
        assert!("8-3".parse::<DelayRange>().is_err());
        assert!("a-b".parse::<DelayRange>().is_err());
    }

    #[test]
    fn test_typing_delay_bounds() {
        let delay = TypingSpeed::Fast.delay();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let d = delay.sample(&mut rng);
            assert!(d >= Duration::from_millis(30) && d < Duration::from_millis(50));
        }
        assert_eq!(TypingSpeed::Slow.delay().base, Duration::from_millis(100));
    }

    #[test]
    fn test_unknown_keys_survive() {
        let settings: Settings =
            serde_json::from_str(r#"{"tone":"formal","legacyFlag":true}"#).unwrap();
        assert_eq!(settings.tone, Tone::Formal);
        assert_eq!(settings.extra.get("legacyFlag"), Some(&Value::Bool(true)));
        let back = serde_json::to_value(&settings).unwrap();
        assert_eq!(back["legacyFlag"], true);
    }
}
