//! Text output formatting with colors.

use xreply_core::{GenerationResult, TWEET_CHAR_LIMIT, twitter_char_count};
use xreply_providers::ProviderDescriptor;
use xreply_store::Settings;

use super::json::{CountOutput, SimulationOutput};
use super::mask_key;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Generation
    // ========================================================================

    /// Formats generated text followed by a provenance line.
    pub fn format_generation(&self, result: &GenerationResult) -> String {
        let chars = twitter_char_count(&result.text);
        let meta = format!(
            "{} · {} · {}/{} chars",
            result.provider.display_name(),
            result.model,
            chars,
            TWEET_CHAR_LIMIT
        );
        format!("{}\n{}", result.text, self.dim(&meta))
    }

    // ========================================================================
    // Count
    // ========================================================================

    /// Formats a character count report.
    pub fn format_count(&self, report: &CountOutput) -> String {
        let budget = format!("{}/{}", report.chars, report.limit);
        let budget = if report.within_limit {
            self.green(&budget)
        } else {
            self.red(&budget)
        };

        let mut lines = vec![
            format!("Characters: {budget} ({} left)", report.remaining),
            format!("Language:   {}", report.language),
            format!("Type:       {}", report.tweet_type),
        ];
        if !report.mentions.is_empty() {
            lines.push(format!("Mentions:   {}", report.mentions.join(", ")));
        }
        if !report.hashtags.is_empty() {
            lines.push(format!("Hashtags:   {}", report.hashtags.join(", ")));
        }
        if let Some(trimmed) = &report.trimmed {
            lines.push(String::new());
            lines.push(self.bold("Trimmed:"));
            lines.push(trimmed.clone());
        }
        lines.join("\n")
    }

    // ========================================================================
    // Providers
    // ========================================================================

    /// Formats the providers table header.
    pub fn format_providers_header(&self) -> String {
        self.bold(&format!(
            "{:<12} {:<12} {:<34} {}",
            "ID", "Name", "Model", "Key"
        ))
    }

    /// Formats one providers table row.
    pub fn format_provider_line(
        &self,
        desc: &ProviderDescriptor,
        settings: &Settings,
        active: bool,
    ) -> String {
        let model = settings
            .model_for(desc.id)
            .unwrap_or_else(|| desc.default_model.to_string());
        let key = settings.api_key_for(desc.id);
        let key_status = if key.trim().is_empty() {
            self.yellow("not set")
        } else {
            self.green(&mask_key(key))
        };
        let marker = if active { self.cyan("*") } else { " ".to_string() };
        format!(
            "{marker}{:<11} {:<12} {:<34} {key_status}",
            desc.cli_name(),
            desc.display_name(),
            model
        )
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Formats settings with keys masked.
    pub fn format_settings(&self, settings: &Settings) -> String {
        let mut lines = vec![
            self.bold("xreply Settings"),
            "─".repeat(40),
            format!("Enabled:       {}", settings.enabled),
            format!(
                "Provider:      {}",
                self.cyan(settings.provider.display_name())
            ),
            format!(
                "Model:         {}",
                settings.active_model().as_deref().unwrap_or("(default)")
            ),
        ];

        lines.push(String::new());
        lines.push("API keys:".to_string());
        for kind in xreply_core::ProviderKind::all() {
            let key = settings.api_key_for(*kind);
            let shown = if key.trim().is_empty() {
                self.dim("not set")
            } else {
                mask_key(key)
            };
            lines.push(format!("  {:<12} {shown}", kind.display_name()));
        }

        let (min, max) = settings.word_range();
        lines.push(String::new());
        lines.push(format!("Words:         {min}-{max}"));
        lines.push(format!("Tone:          {}", settings.tone));
        lines.push(format!("Emoji:         {}", settings.include_emoji));
        lines.push(format!("Default text:  {}", settings.default_text));
        lines.push(format!("Delay range:   {}s", settings.delay_range));
        lines.push(format!("Typing speed:  {}", settings.typing_speed));
        lines.join("\n")
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Formats a simulated insertion.
    pub fn format_simulation(&self, report: &SimulationOutput) -> String {
        let mut lines = vec![format!("Editor accepts: {}", report.accept)];
        for attempt in &report.attempts {
            let status = match (&attempt.verified_via, &attempt.error) {
                (Some(via), _) => self.green(&format!("✓ verified via {via}")),
                (None, Some(error)) => self.red(&format!("✗ {error}")),
                (None, None) if attempt.handled => self.yellow("✗ not reflected"),
                (None, None) => self.dim("– skipped"),
            };
            lines.push(format!("  {:<12} {status}", attempt.strategy));
        }

        lines.push(String::new());
        match (&report.method, &report.error) {
            (Some(method), _) => lines.push(format!("Inserted via {}", self.bold(method))),
            (None, Some(error)) => lines.push(self.red(error)),
            (None, None) => {}
        }
        lines.push(format!("Composer:  {:?}", report.composer_text));
        if !report.clipboard.is_empty() {
            lines.push(format!("Clipboard: {:?}", report.clipboard));
        }
        lines.join("\n")
    }

    // ========================================================================
    // Color Helpers
    // ========================================================================

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    pub(crate) fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}
