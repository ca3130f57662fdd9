//! URL-weighted character counting.
//!
//! The target platform charges every link a flat [`URL_CHAR_COUNT`] units no
//! matter how long it is. Everything else counts one unit per `char`.

use regex::Regex;
use std::sync::LazyLock;

/// Maximum units in a single post.
pub const TWEET_CHAR_LIMIT: usize = 280;

/// Units charged per embedded URL.
pub const URL_CHAR_COUNT: usize = 23;

const ELLIPSIS: &str = "...";

/// Pattern for embedded links.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("Invalid regex"));

/// Counts `text` the way the platform does.
pub fn twitter_char_count(text: &str) -> usize {
    let raw = text.chars().count();
    URL_RE.find_iter(text).fold(raw, |count, url| {
        count - url.as_str().chars().count() + URL_CHAR_COUNT
    })
}

/// Trims `text` to [`TWEET_CHAR_LIMIT`] units.
///
/// Text already within budget is returned unchanged. Otherwise whole words
/// are kept from the front, and `"..."` is appended. Each candidate is
/// counted with the ellipsis attached, since the ellipsis can complete a
/// bare scheme such as `http://` into a link.
pub fn enforce_char_limit(text: &str) -> String {
    enforce_limit(text, TWEET_CHAR_LIMIT)
}

pub(crate) fn enforce_limit(text: &str, limit: usize) -> String {
    if twitter_char_count(text) <= limit {
        return text.to_string();
    }

    let fits = |candidate: &str| twitter_char_count(&format!("{candidate}{ELLIPSIS}")) <= limit;
    let mut trimmed = String::new();

    for word in text.split_whitespace() {
        let candidate = if trimmed.is_empty() {
            word.to_string()
        } else {
            format!("{trimmed} {word}")
        };
        if !fits(candidate.as_str()) {
            break;
        }
        trimmed = candidate;
    }

    // A single oversized leading word: cut it by chars instead.
    if trimmed.is_empty() {
        if let Some(word) = text.split_whitespace().next() {
            for (idx, ch) in word.char_indices() {
                let candidate = &word[..idx + ch.len_utf8()];
                if !fits(candidate) {
                    break;
                }
                trimmed = candidate.to_string();
            }
        }
    }

    trimmed.push_str(ELLIPSIS);
    trimmed
}
