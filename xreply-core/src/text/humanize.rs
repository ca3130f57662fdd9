//! Stochastic humanization of generated text.
//!
//! Every random draw goes through the caller's [`Rng`], so a seeded
//! generator makes the output reproducible. The number of draws does not
//! depend on the input, which keeps a seed's stream aligned across inputs.

use rand::Rng;
use regex::{NoExpand, Regex};

// ============================================================================
// Configuration
// ============================================================================

/// A formal word or phrase and its casual replacement.
#[derive(Debug, Clone)]
pub struct WordSubstitution {
    /// Phrase to replace (matched case-insensitively on word boundaries).
    pub formal: &'static str,
    /// Replacement text.
    pub casual: &'static str,
    /// Chance that this substitution applies to the whole text.
    pub probability: f64,
    pattern: Regex,
}

impl WordSubstitution {
    /// Creates a substitution.
    pub fn new(formal: &'static str, casual: &'static str, probability: f64) -> Self {
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(formal)))
            .expect("Invalid regex");
        Self {
            formal,
            casual,
            probability,
            pattern,
        }
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, NoExpand(self.casual)).into_owned()
    }
}

/// Probabilities used by [`humanize`].
#[derive(Debug, Clone)]
pub struct HumanizeConfig {
    /// Chance of lowercasing a leading capital letter.
    pub lowercase_first: f64,
    /// Substitutions, applied in order.
    pub substitutions: Vec<WordSubstitution>,
    /// Chance of touching terminal punctuation at all.
    pub punctuation: f64,
    /// Given the punctuation gate, chance of `!` becoming `!!`.
    pub double_exclamation: f64,
    /// Given the punctuation gate, chance of `?` becoming `??`.
    pub double_question: f64,
    /// Given the punctuation gate, chance of appending `...` to unpunctuated text.
    pub ellipsis: f64,
}

impl Default for HumanizeConfig {
    fn default() -> Self {
        Self {
            lowercase_first: 0.25,
            substitutions: vec![
                WordSubstitution::new("you are", "ur", 0.4),
                WordSubstitution::new("people", "ppl", 0.3),
                WordSubstitution::new("thank you", "thx", 0.5),
                WordSubstitution::new("thanks", "thx", 0.4),
                WordSubstitution::new("because", "bc", 0.3),
                WordSubstitution::new("with", "w/", 0.15),
                WordSubstitution::new("without", "w/o", 0.15),
                WordSubstitution::new("okay", "ok", 0.4),
                WordSubstitution::new("about", "bout", 0.2),
                WordSubstitution::new("something", "smth", 0.2),
                WordSubstitution::new("someone", "sb", 0.2),
                WordSubstitution::new("before", "b4", 0.15),
                WordSubstitution::new("for", "4", 0.1),
                WordSubstitution::new("to", "2", 0.05),
                WordSubstitution::new("too", "2", 0.05),
            ],
            punctuation: 0.1,
            double_exclamation: 0.3,
            double_question: 0.2,
            ellipsis: 0.15,
        }
    }
}

impl HumanizeConfig {
    /// A configuration that never changes the text.
    pub fn disabled() -> Self {
        Self {
            lowercase_first: 0.0,
            substitutions: Vec::new(),
            punctuation: 0.0,
            double_exclamation: 0.0,
            double_question: 0.0,
            ellipsis: 0.0,
        }
    }

    /// A configuration where every transform fires.
    pub fn always() -> Self {
        let mut config = Self::default();
        config.lowercase_first = 1.0;
        for sub in &mut config.substitutions {
            sub.probability = 1.0;
        }
        config.punctuation = 1.0;
        config.double_exclamation = 1.0;
        config.double_question = 1.0;
        config.ellipsis = 1.0;
        config
    }
}

// ============================================================================
// Humanize
// ============================================================================

fn roll<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    rng.gen_range(0.0..1.0) < probability
}

/// Applies lowercase, word-substitution and punctuation variations.
pub fn humanize<R: Rng + ?Sized>(text: &str, config: &HumanizeConfig, rng: &mut R) -> String {
    let mut out = text.to_string();

    if roll(rng, config.lowercase_first) {
        let mut chars = out.chars();
        if let Some(first) = chars.next().filter(char::is_ascii_uppercase) {
            out = first.to_ascii_lowercase().to_string() + chars.as_str();
        }
    }

    // Draw every substitution up front so the stream length is fixed.
    let chosen: Vec<bool> = config
        .substitutions
        .iter()
        .map(|sub| roll(rng, sub.probability))
        .collect();
    for (sub, apply) in config.substitutions.iter().zip(chosen) {
        if apply {
            out = sub.apply(&out);
        }
    }

    if roll(rng, config.punctuation) {
        out = vary_terminal_punctuation(out, config, rng);
    }

    out
}

fn vary_terminal_punctuation<R: Rng + ?Sized>(
    mut text: String,
    config: &HumanizeConfig,
    rng: &mut R,
) -> String {
    let exclaim = roll(rng, config.double_exclamation);
    let question = roll(rng, config.double_question);
    let ellipsis = roll(rng, config.ellipsis);

    let trimmed_len = text.trim_end().len();
    text.truncate(trimmed_len);

    if text.ends_with('!') {
        if exclaim && !text.ends_with("!!") {
            text.push('!');
        }
    } else if text.ends_with('?') {
        if question && !text.ends_with("??") {
            text.push('?');
        }
    } else if ellipsis && !text.is_empty() && !text.ends_with(['.', '…']) {
        text.push_str("...");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_disabled_is_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        let text = "Thank you, you are great because people care!";
        assert_eq!(humanize(text, &HumanizeConfig::disabled(), &mut rng), text);
    }

    #[test]
    fn test_always_applies_everything() {
        let mut rng = StdRng::seed_from_u64(7);
        let out = humanize(
            "Thank you, you are great because people care!",
            &HumanizeConfig::always(),
            &mut rng,
        );
        assert_eq!(out, "thx, ur great bc ppl care!!");
    }

    #[test]
    fn test_substitutions_respect_word_boundaries() {
        let config = HumanizeConfig::always();
        let mut rng = StdRng::seed_from_u64(1);
        let out = humanize("Without tomatoes, forever", &config, &mut rng);
        assert_eq!(out, "w/o tomatoes, forever...");
    }

    #[test]
    fn test_question_doubled() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = humanize("why not?", &HumanizeConfig::always(), &mut rng);
        assert_eq!(out, "why not??");
    }

    #[test]
    fn test_same_seed_same_output() {
        let config = HumanizeConfig::default();
        let text = "Thank you for the tips, you are right about people!";
        let a = humanize(text, &config, &mut StdRng::seed_from_u64(42));
        let b = humanize(text, &config, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
