// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # xreply Fetch
//!
//! Network plumbing shared by every provider adapter.
//!
//! - [`http::HttpClient`] - reqwest wrapper with tracing and a domain allowlist
//! - [`error::FetchError`] - Detailed failures and their retry classification
//! - [`retry::RetryController`] - Bounded exponential backoff with `Retry-After`
//! - [`adapter::ProviderAdapter`] - One network attempt against one provider
//! - [`client::GenerationClient`] - `generate(prompt, api_key, model)` with retries
//!
//! ## Example
//!
//! ```ignore
//! use xreply_fetch::{FetchContext, GenerationClient};
//!
//! let ctx = FetchContext::new();
//! let client = GenerationClient::new(adapter, ctx);
//! let text = client.generate("Say hi", &api_key, None).await?;
//! ```

pub mod adapter;
pub mod client;
pub mod context;
pub mod error;
pub mod http;
pub mod retry;

// Errors
pub use error::FetchError;

// HTTP
pub use http::{HttpClient, ResponseExt, check_response, error_message_from_body};

// Retry
pub use retry::{RetryController, RetryPolicy};

// Adapters & client
pub use adapter::{CompletionRequest, ProviderAdapter, SamplingParams};
pub use client::{Completion, GenerationClient};
pub use context::{FetchContext, FetchSettings};
