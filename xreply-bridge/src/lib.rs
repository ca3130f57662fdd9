// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # xreply Bridge
//!
//! Carries requests from the unprivileged page context to the background,
//! which owns settings and the network, and runs the page-side flows that
//! turn a click into inserted text.
//!
//! ## Flow
//!
//! ```text
//! ComposerSession ──Request──▶ MessagePort ──▶ BackgroundService
//!   guard, button,                               read settings
//!   extract tweet                                build prompt
//!        ▲                                       GenerationClient
//!        └──────────────Response────────────────  post-process
//!   locate composer → InsertionChain → (clipboard fallback)
//! ```
//!
//! A port whose background has gone away reports
//! [`ReplyError::ContextInvalidated`](xreply_core::ReplyError), which asks
//! the user to refresh the page.

pub mod background;
pub mod error;
pub mod port;
pub mod prompts;
pub mod protocol;
pub mod session;

pub use background::{BackgroundService, InstallReason};
pub use error::BridgeError;
pub use port::{
    DEFAULT_PORT_CAPACITY, InProcessPort, IncomingMessage, MessagePort, PortListener,
    RuntimeBridge, channel,
};
pub use prompts::{TOPIC_WORD_RANGE, reply_prompt, tone_instruction, topic_prompt};
pub use protocol::{Request, Response};
pub use session::{
    ButtonState, ComposerSession, Delivery, MemoryNotifier, NotificationLevel, Notifier,
    SessionTimings, TracingNotifier,
};
