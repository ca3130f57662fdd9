//! Reply post-processing pipeline.
//!
//! Raw model output goes through, in order:
//!
//! 1. Narrator-phrase stripping
//! 2. Wrapping quote removal
//! 3. Humanization (see [`super::humanize`])
//! 4. Default suffix text
//! 5. Whitespace collapsing
//! 6. Character budget enforcement

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::count::{TWEET_CHAR_LIMIT, enforce_limit};
use super::humanize::{HumanizeConfig, humanize};

// ============================================================================
// Regex Patterns
// ============================================================================

/// Leading and trailing narrator artifacts, applied in order.
static ARTIFACT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(Here's|Here is) (a|an|the) (reply|response|tweet):\s*",
        r"(?i)^(Reply|Response|Tweet):\s*",
        r"(?i)^I (would|will|can) (say|reply|respond):\s*",
        r"(?im)^(As an AI|As a language model|I'm an AI).*$",
        r"(?im)\n.*explanation.*$",
        r"(?im)\n.*note.*$",
        r"(?i)^(I think:|My response would be:|Here's what I'd say:)\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid regex"))
    .collect()
});

const QUOTE_PAIRS: &[(char, char)] = &[('"', '"'), ('\'', '\''), ('\u{201C}', '\u{201D}')];

// ============================================================================
// Options
// ============================================================================

/// Per-request options taken from settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostProcessOptions {
    /// Suffix appended to every reply, such as a signature hashtag.
    pub default_text: Option<String>,
}

impl PostProcessOptions {
    /// Sets the default suffix. Blank text disables it.
    pub fn with_default_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.default_text = (!text.trim().is_empty()).then_some(text);
        self
    }
}

// ============================================================================
// Post-Processor
// ============================================================================

/// Turns raw model output into a postable reply.
#[derive(Debug, Clone)]
pub struct ReplyPostProcessor {
    humanize: HumanizeConfig,
    char_limit: usize,
}

impl Default for ReplyPostProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyPostProcessor {
    /// Creates a processor with the standard humanization probabilities.
    pub fn new() -> Self {
        Self {
            humanize: HumanizeConfig::default(),
            char_limit: TWEET_CHAR_LIMIT,
        }
    }

    /// Replaces the humanization configuration.
    pub fn with_humanize(mut self, config: HumanizeConfig) -> Self {
        self.humanize = config;
        self
    }

    /// Returns the humanization configuration.
    pub fn humanize_config(&self) -> &HumanizeConfig {
        &self.humanize
    }

    /// Runs the full pipeline.
    pub fn process<R: Rng + ?Sized>(
        &self,
        raw: &str,
        options: &PostProcessOptions,
        rng: &mut R,
    ) -> String {
        let cleaned = strip_wrapping_quotes(&strip_artifacts(raw));
        let humanized = humanize(&cleaned, &self.humanize, rng);
        let with_suffix = match options.default_text.as_deref() {
            Some(suffix) => append_default_text(&humanized, suffix),
            None => humanized,
        };
        let collapsed = collapse_whitespace(&with_suffix);
        let out = enforce_limit(&collapsed, self.char_limit);

        debug!(
            raw_len = raw.len(),
            out_len = out.len(),
            trimmed = out.len() < collapsed.len(),
            "Post-processed reply"
        );
        out
    }
}

/// Removes narrator phrases such as "Here's a reply:" or "As an AI...".
pub fn strip_artifacts(raw: &str) -> String {
    let mut text = raw.trim().to_string();
    for pattern in ARTIFACT_PATTERNS.iter() {
        text = pattern.replace_all(&text, "").into_owned();
    }
    text.trim().to_string()
}

/// Removes one pair of quotes wrapping the entire text.
pub fn strip_wrapping_quotes(text: &str) -> String {
    let trimmed = text.trim();
    for (open, close) in QUOTE_PAIRS {
        if trimmed.chars().count() >= 2 && trimmed.starts_with(*open) && trimmed.ends_with(*close)
        {
            let inner = &trimmed[open.len_utf8()..trimmed.len() - close.len_utf8()];
            return inner.trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Appends `suffix`, separated by one space unless the reply already ends
/// in whitespace or the suffix starts with whitespace, `#` or `@`.
pub fn append_default_text(reply: &str, suffix: &str) -> String {
    if suffix.trim().is_empty() {
        return reply.to_string();
    }
    let needs_space = !reply.is_empty()
        && !reply.ends_with(char::is_whitespace)
        && !suffix.starts_with(|c: char| c.is_whitespace() || c == '#' || c == '@');
    let mut out = String::with_capacity(reply.len() + suffix.len() + 1);
    out.push_str(reply);
    if needs_space {
        out.push(' ');
    }
    out.push_str(suffix);
    out
}

/// Collapses whitespace runs to single spaces and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
