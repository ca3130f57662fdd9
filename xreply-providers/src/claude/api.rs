//! Messages API wire types.

use serde::{Deserialize, Serialize};
use xreply_fetch::CompletionRequest;

use crate::chat::ChatMessage;

/// Messages request body.
#[derive(Debug, Serialize)]
pub struct ClaudeRequest<'a> {
    /// Model id.
    pub model: &'a str,
    /// Conversation.
    pub messages: Vec<ChatMessage>,
    /// Output token cap.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl<'a> ClaudeRequest<'a> {
    /// Builds the body for one prompt.
    pub fn from_completion(request: &CompletionRequest<'a>) -> Self {
        Self {
            model: request.model,
            messages: vec![ChatMessage::user(request.prompt)],
            max_tokens: request.params.max_output_tokens,
            temperature: request.params.temperature,
        }
    }
}

/// Messages response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct ClaudeResponse {
    /// Content blocks.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Why generation stopped.
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// A content block.
#[derive(Debug, Default, Deserialize)]
pub struct ContentBlock {
    /// Block type, usually `text`.
    #[serde(default, rename = "type")]
    pub block_type: String,
    /// Text, for text blocks.
    #[serde(default)]
    pub text: Option<String>,
}

impl ClaudeResponse {
    /// Returns `content[0].text`.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first()?.text.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xreply_fetch::SamplingParams;

    #[test]
    fn test_request_has_no_top_p() {
        let request = CompletionRequest {
            prompt: "hi",
            api_key: "sk-ant-x",
            model: "claude-opus-4-20250514",
            params: SamplingParams::STANDARD,
        };
        let json = serde_json::to_value(ClaudeRequest::from_completion(&request)).unwrap();
        assert_eq!(json["max_tokens"], 150);
        assert_eq!(json["messages"][0]["content"], "hi");
        assert!(json.get("top_p").is_none());
    }

    #[test]
    fn test_first_text() {
        let parsed: ClaudeResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"sure"}],"stop_reason":"end_turn"}"#,
        )
        .unwrap();
        assert_eq!(parsed.first_text(), Some("sure"));
        assert_eq!(parsed.content[0].block_type, "text");
    }
}
