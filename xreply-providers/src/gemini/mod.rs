//! Gemini (Google) provider.
//!
//! Gemini takes a single content part and authenticates with a `key` query
//! parameter.
//!
//! ## API Endpoint
//!
//! - `POST /v1beta/models/{model}:generateContent?key={key}`
//! - Text at `candidates[0].content.parts[0].text`

mod adapter;
mod api;
mod descriptor;

pub use adapter::{GEMINI_API_BASE, GEMINI_DEFAULT_MODEL, GeminiAdapter};
pub use api::{GeminiRequest, GeminiResponse, GenerationConfig, SafetySetting};
pub use descriptor::gemini_descriptor;
