//! Generation request and result types.

use serde::{Deserialize, Serialize};

use super::{ProviderKind, TweetContent};

/// What a generation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
    /// A reply to an existing tweet.
    Reply,
    /// A standalone tweet about a topic.
    Tweet,
}

impl GenerationKind {
    /// Returns a lowercase label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reply => "reply",
            Self::Tweet => "tweet",
        }
    }
}

/// A single generation request.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    /// Reply to a scraped tweet.
    Reply(TweetContent),
    /// Write a tweet about a topic.
    Tweet(String),
}

impl GenerationRequest {
    /// Returns the kind of output requested.
    pub fn kind(&self) -> GenerationKind {
        match self {
            Self::Reply(_) => GenerationKind::Reply,
            Self::Tweet(_) => GenerationKind::Tweet,
        }
    }
}

/// A successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// What was generated.
    pub kind: GenerationKind,
    /// Post-processed text ready for insertion.
    pub text: String,
    /// Provider that produced it.
    pub provider: ProviderKind,
    /// Model that produced it.
    pub model: String,
}
