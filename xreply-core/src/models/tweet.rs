//! Tweet content scraped from the page.
//!
//! A [`TweetContent`] is built fresh for each generation request and owned
//! by that request. It is never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::text::{detect_language, detect_tweet_type, extract_hashtags, extract_mentions};

// ============================================================================
// Tweet Type
// ============================================================================

/// Heuristic classification of a tweet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TweetType {
    /// Breaking news or announcements.
    News,
    /// Personal updates (fallback).
    #[default]
    Personal,
    /// Contains a question.
    Question,
    /// Tips and learning material.
    Educational,
    /// Jokes and memes.
    Humor,
    /// Opinions and beliefs.
    Opinion,
    /// Sales and offers.
    Promotional,
    /// Part of a numbered thread.
    Thread,
}

impl TweetType {
    /// Returns the identifier used in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Personal => "personal",
            Self::Question => "question",
            Self::Educational => "educational",
            Self::Humor => "humor",
            Self::Opinion => "opinion",
            Self::Promotional => "promotional",
            Self::Thread => "thread",
        }
    }
}

impl fmt::Display for TweetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Engagement
// ============================================================================

/// Engagement counters shown under a tweet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Engagement {
    /// Reply count.
    pub replies: u64,
    /// Retweet count.
    pub retweets: u64,
    /// Like count.
    pub likes: u64,
}

impl Engagement {
    /// Parses a counter label such as `"12"`, `"1,204"`, `"3.4K"` or `"2M"`.
    ///
    /// Unparseable labels count as zero.
    pub fn parse_count(label: &str) -> u64 {
        let cleaned: String = label.trim().chars().filter(|c| *c != ',').collect();
        if cleaned.is_empty() {
            return 0;
        }

        let (number, multiplier) = match cleaned.chars().last() {
            Some('K' | 'k') => (&cleaned[..cleaned.len() - 1], 1_000.0),
            Some('M' | 'm') => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
            _ => (cleaned.as_str(), 1.0),
        };

        number
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map_or(0, |n| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let value = (n * multiplier).round() as u64;
                value
            })
    }
}

// ============================================================================
// Tweet Content
// ============================================================================

/// Author placeholder when the page does not expose a name.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// A tweet scraped from the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct TweetContent {
    /// Tweet body.
    pub text: String,
    /// Author display name, or [`UNKNOWN_AUTHOR`].
    #[serde(default = "unknown_author")]
    pub author: String,
    /// Detected language code (`en`, `fa`, `ar`, `zh`, `ja`).
    #[serde(default = "default_language")]
    pub language: String,
    /// Heuristic type.
    #[serde(default, rename = "type")]
    pub tweet_type: TweetType,
    /// Whether the tweet carries images or video.
    #[serde(default)]
    pub has_media: bool,
    /// Whether the tweet is part of a thread.
    #[serde(default)]
    pub is_thread: bool,
    /// Whether the tweet is itself a reply.
    #[serde(default)]
    pub is_reply: bool,
    /// Whether the author is verified.
    #[serde(default)]
    pub is_verified: bool,
    /// Mentioned handles without `@`.
    #[serde(default)]
    pub mentions: Vec<String>,
    /// Hashtags without `#`.
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Engagement counters.
    #[serde(default)]
    pub engagement: Engagement,
    /// Publication time, if shown.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

fn unknown_author() -> String {
    UNKNOWN_AUTHOR.to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl TweetContent {
    /// Builds content from bare text, deriving language, type, mentions and hashtags.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into().trim().to_string();
        Self {
            author: unknown_author(),
            language: detect_language(&text).to_string(),
            tweet_type: detect_tweet_type(&text),
            has_media: false,
            is_thread: false,
            is_reply: false,
            is_verified: false,
            mentions: extract_mentions(&text),
            hashtags: extract_hashtags(&text),
            engagement: Engagement::default(),
            timestamp: None,
            text,
        }
    }

    /// Sets the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        let author = author.into();
        self.author = if author.trim().is_empty() {
            unknown_author()
        } else {
            author.trim().to_string()
        };
        self
    }

    /// Sets the engagement counters.
    pub fn with_engagement(mut self, engagement: Engagement) -> Self {
        self.engagement = engagement;
        self
    }

    /// Sets the timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Returns true if there is no text to reply to.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_derives_fields() {
        let tweet = TweetContent::from_text("  Anyone tried #rust with @tokio_rs? ");
        assert_eq!(tweet.text, "Anyone tried #rust with @tokio_rs?");
        assert_eq!(tweet.language, "en");
        assert_eq!(tweet.tweet_type, TweetType::Question);
        assert_eq!(tweet.mentions, vec!["tokio_rs"]);
        assert_eq!(tweet.hashtags, vec!["rust"]);
        assert_eq!(tweet.author, UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_blank_author_is_unknown() {
        let tweet = TweetContent::from_text("hi").with_author("   ");
        assert_eq!(tweet.author, UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_parse_count_suffixes() {
        assert_eq!(Engagement::parse_count("12"), 12);
        assert_eq!(Engagement::parse_count("1,204"), 1204);
        assert_eq!(Engagement::parse_count("3.4K"), 3400);
        assert_eq!(Engagement::parse_count("2M"), 2_000_000);
        assert_eq!(Engagement::parse_count(""), 0);
        assert_eq!(Engagement::parse_count("n/a"), 0);
    }

    #[test]
    fn test_wire_shape_uses_camel_case_and_type() {
        let tweet = TweetContent::from_text("breaking news");
        let json = serde_json::to_value(&tweet).unwrap();
        assert_eq!(json["type"], "news");
        assert_eq!(json["hasMedia"], false);
        assert!(json.get("tweet_type").is_none());
    }

    #[test]
    fn test_deserialize_minimal_payload() {
        let tweet: TweetContent = serde_json::from_str(r#"{"text":"hello"}"#).unwrap();
        assert_eq!(tweet.author, UNKNOWN_AUTHOR);
        assert_eq!(tweet.language, "en");
        assert_eq!(tweet.tweet_type, TweetType::Personal);
    }
}
