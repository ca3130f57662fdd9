//! Claude (Anthropic) provider.
//!
//! ## API Endpoint
//!
//! - `POST /v1/messages`
//! - Headers: `x-api-key`, `anthropic-version: 2023-06-01`
//! - Text at `content[0].text`

mod adapter;
mod api;
mod descriptor;

pub use adapter::{ANTHROPIC_VERSION, CLAUDE_API_BASE, CLAUDE_DEFAULT_MODEL, ClaudeAdapter};
pub use api::{ClaudeRequest, ClaudeResponse};
pub use descriptor::claude_descriptor;
