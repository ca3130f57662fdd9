//! Cross-context message protocol.
//!
//! Requests are JSON objects tagged by `action`. Older senders tag with
//! `type` instead, and both spellings are accepted on the way in. Outgoing
//! requests always use `action`.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use xreply_core::{ErrorKind, GENERATION_FAILED_MESSAGE, ReplyError, TweetContent};
use xreply_store::Settings;

// ============================================================================
// Request
// ============================================================================

/// A message from the page context to the background.
// `remote = "Self"` turns the derived impls into inherent functions so the
// trait impls below can normalize the tag before delegating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    remote = "Self",
    tag = "action",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Request {
    /// Write a reply to a scraped tweet.
    GenerateReply {
        /// The tweet being replied to.
        tweet_content: TweetContent,
    },
    /// Write a standalone tweet from a finished prompt.
    GenerateTweet {
        /// Prompt text.
        prompt: String,
    },
    /// Usage counter event.
    RecordStats {
        /// What happened.
        stats_action: String,
        /// Event payload.
        #[serde(default)]
        data: Value,
    },
    /// The settings record was saved elsewhere.
    SettingsUpdated {
        /// The saved record.
        settings: Settings,
    },
    /// Open the settings popup.
    OpenPopup,
}

impl Request {
    /// Returns the wire discriminator.
    pub fn action(&self) -> &'static str {
        match self {
            Self::GenerateReply { .. } => "generateReply",
            Self::GenerateTweet { .. } => "generateTweet",
            Self::RecordStats { .. } => "recordStats",
            Self::SettingsUpdated { .. } => "settingsUpdated",
            Self::OpenPopup => "openPopup",
        }
    }
}

impl Serialize for Request {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Request::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Request {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut object = Map::<String, Value>::deserialize(deserializer)?;
        if !object.contains_key("action") {
            let Some(tag) = object.remove("type") else {
                return Err(de::Error::missing_field("action"));
            };
            object.insert("action".to_string(), tag);
        }
        Request::deserialize(Value::Object(object)).map_err(de::Error::custom)
    }
}

// ============================================================================
// Response
// ============================================================================

/// The background's answer to a [`Request`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Whether the request succeeded.
    pub success: bool,
    /// Generated reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// Generated tweet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tweet: Option<String>,
    /// User-facing failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure category, so the receiver can rebuild the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl Response {
    /// A bare acknowledgement.
    pub fn ack() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// A successful reply.
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
            ..Self::ack()
        }
    }

    /// A successful tweet.
    pub fn tweet(text: impl Into<String>) -> Self {
        Self {
            tweet: Some(text.into()),
            ..Self::ack()
        }
    }

    /// A failure.
    pub fn failure(err: &ReplyError) -> Self {
        Self {
            success: false,
            error: Some(err.user_message()),
            error_kind: Some(err.kind()),
            ..Self::default()
        }
    }

    /// Extracts the generated text.
    ///
    /// # Errors
    ///
    /// Rebuilds the sender's error for a failure, and reports a generic
    /// provider failure for a success that carries no text.
    pub fn into_text(self) -> Result<String, ReplyError> {
        if !self.success {
            let message = self
                .error
                .unwrap_or_else(|| GENERATION_FAILED_MESSAGE.to_string());
            return Err(ReplyError::from_parts(self.error_kind, message));
        }
        self.reply
            .or(self.tweet)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ReplyError::Provider {
                message: GENERATION_FAILED_MESSAGE.to_string(),
                retryable: false,
            })
    }
}
