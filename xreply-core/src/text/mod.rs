//! Reply text toolkit.
//!
//! - [`count`] - URL-weighted character counting and length enforcement
//! - [`analysis`] - Language, type, mention and hashtag heuristics
//! - [`postprocess`] - The reply post-processing pipeline
//! - [`humanize`] - Seedable stochastic humanization

pub mod analysis;
pub mod count;
pub mod humanize;
pub mod postprocess;

pub use analysis::{detect_language, detect_tweet_type, extract_hashtags, extract_mentions};
pub use count::{TWEET_CHAR_LIMIT, URL_CHAR_COUNT, enforce_char_limit, twitter_char_count};
pub use humanize::{HumanizeConfig, WordSubstitution, humanize};
pub use postprocess::{PostProcessOptions, ReplyPostProcessor};
