//! Output formatting for CLI.

mod json;
mod text;

pub use json::{
    AttemptOutput, CountOutput, GenerationOutput, JsonFormatter, ProviderInfoOutput,
    SimulationOutput,
};
pub use text::TextFormatter;

/// Shortens an API key for display. Empty keys stay empty.
pub fn mask_key(key: &str) -> String {
    let key = key.trim();
    let chars: Vec<char> = key.chars().collect();
    match chars.len() {
        0 => String::new(),
        n if n <= 12 => "••••".to_string(),
        n => {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[n - 4..].iter().collect();
            format!("{head}…{tail}")
        }
    }
}
