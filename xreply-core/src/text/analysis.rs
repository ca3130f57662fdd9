//! Lightweight tweet heuristics.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::TweetType;

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_]+)").expect("Invalid regex"));

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_]+)").expect("Invalid regex"));

/// Letters used by Persian but not by Arabic (پ چ ژ ک گ ی).
const PERSIAN_LETTERS: &[char] = &['\u{067E}', '\u{0686}', '\u{0698}', '\u{06A9}', '\u{06AF}', '\u{06CC}'];

fn in_range(c: char, lo: u32, hi: u32) -> bool {
    (lo..=hi).contains(&u32::from(c))
}

/// Detects the script-level language of `text`.
///
/// Returns one of `fa`, `ar`, `zh`, `ja`, or `en` as the fallback.
pub fn detect_language(text: &str) -> &'static str {
    if text.chars().any(|c| PERSIAN_LETTERS.contains(&c)) {
        return "fa";
    }
    if text.chars().any(|c| in_range(c, 0x0600, 0x06FF)) {
        return "ar";
    }
    if text.chars().any(|c| in_range(c, 0x4E00, 0x9FFF)) {
        return "zh";
    }
    if text
        .chars()
        .any(|c| in_range(c, 0x3040, 0x309F) || in_range(c, 0x30A0, 0x30FF))
    {
        return "ja";
    }
    "en"
}

/// Classifies a tweet by keyword, first match wins.
pub fn detect_tweet_type(text: &str) -> TweetType {
    let lower = text.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has(&["?"]) {
        TweetType::Question
    } else if has(&["news", "breaking"]) {
        TweetType::News
    } else if has(&["learn", "tip"]) {
        TweetType::Educational
    } else if has(&["😂", "lol", "funny"]) {
        TweetType::Humor
    } else if has(&["buy", "sale", "discount"]) {
        TweetType::Promotional
    } else if has(&["1/", "thread"]) {
        TweetType::Thread
    } else if has(&["think", "believe"]) {
        TweetType::Opinion
    } else {
        TweetType::Personal
    }
}

/// Extracts `@handles` without the `@`.
pub fn extract_mentions(text: &str) -> Vec<String> {
    MENTION_RE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Extracts `#tags` without the `#`.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_RE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}
