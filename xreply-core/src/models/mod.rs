//! Domain models for xreply.
//!
//! ## Submodules
//!
//! - [`provider`] - Supported language-model services
//! - [`tweet`] - Tweet content scraped from the page
//! - [`generation`] - Generation request/result
//! - [`pacing`] - Delivery pacing

mod generation;
mod pacing;
mod provider;
mod tweet;

pub use generation::{GenerationKind, GenerationRequest, GenerationResult};
pub use pacing::TypingDelay;
pub use provider::ProviderKind;
pub use tweet::{Engagement, TweetContent, TweetType, UNKNOWN_AUTHOR};
