//! Gemini wire types.

use serde::{Deserialize, Serialize};
use xreply_fetch::SamplingParams;

// ============================================================================
// Request
// ============================================================================

/// Harm categories relaxed for casual replies.
const SAFETY_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Prompt contents.
    pub contents: Vec<Content>,
    /// Sampling configuration.
    pub generation_config: GenerationConfig,
    /// Safety thresholds.
    pub safety_settings: Vec<SafetySetting>,
}

impl GeminiRequest {
    /// Builds the body for one prompt.
    pub fn new(prompt: &str, params: SamplingParams) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                top_k: params.top_k,
                top_p: params.top_p,
                max_output_tokens: params.max_output_tokens,
                candidate_count: 1,
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: (*category).to_string(),
                    threshold: "BLOCK_NONE".to_string(),
                })
                .collect(),
        }
    }
}

/// A content block.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Content {
    /// Parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A content part.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Part {
    /// Text, when the part is textual.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Sampling configuration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Temperature.
    pub temperature: f64,
    /// Top-k cutoff.
    pub top_k: u32,
    /// Nucleus sampling mass.
    pub top_p: f64,
    /// Output token cap.
    pub max_output_tokens: u32,
    /// Number of candidates.
    pub candidate_count: u32,
}

/// A safety threshold.
#[derive(Debug, Serialize)]
pub struct SafetySetting {
    /// Harm category.
    pub category: String,
    /// Blocking threshold.
    pub threshold: String,
}

// ============================================================================
// Response
// ============================================================================

/// `generateContent` response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct GeminiResponse {
    /// Candidates.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One candidate.
#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    /// Generated content.
    #[serde(default)]
    pub content: Option<Content>,
}

impl GeminiResponse {
    /// Returns `candidates[0].content.parts[0].text`.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}
