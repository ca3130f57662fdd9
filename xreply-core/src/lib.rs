// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # xreply Core
//!
//! Core types, errors, and text processing shared by every xreply crate.
//!
//! ## Key Types
//!
//! ### Models
//! - [`ProviderKind`] - The five supported language-model services
//! - [`TweetContent`] - A tweet scraped from the page for one generation request
//! - [`GenerationRequest`] / [`GenerationResult`] - Request and result of one generation
//!
//! ### Errors
//! - [`ReplyError`] - User-facing error taxonomy
//! - [`CoreError`] - Parsing and validation errors inside this crate
//!
//! ### Text
//! - [`twitter_char_count`] - URL-weighted character counting
//! - [`ReplyPostProcessor`] - Cleans, humanizes, and fits raw model output
//! - [`detect_language`] / [`detect_tweet_type`] - Lightweight tweet heuristics

pub mod error;
pub mod models;
pub mod text;

// Re-export error types
pub use error::{
    CONTEXT_INVALIDATED_MESSAGE, CoreError, ErrorKind, GENERATION_FAILED_MESSAGE,
    INVALID_KEY_MESSAGE, RATE_LIMIT_MESSAGE, ReplyError,
};

// Re-export models
pub use models::{
    Engagement, GenerationKind, GenerationRequest, GenerationResult, ProviderKind, TweetContent,
    TweetType, TypingDelay, UNKNOWN_AUTHOR,
};

// Re-export text processing
pub use text::{
    HumanizeConfig, PostProcessOptions, ReplyPostProcessor, URL_CHAR_COUNT, TWEET_CHAR_LIMIT,
    detect_language, detect_tweet_type, enforce_char_limit, extract_hashtags, extract_mentions,
    twitter_char_count,
};
