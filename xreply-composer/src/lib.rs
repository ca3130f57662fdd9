// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # xreply Composer
//!
//! Locates the reply composer on the host page and gets text into it in a
//! way the page's rich-text editor actually recognizes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       InsertionChain                         │
//! │  ┌───────────┐  ┌────────────┐  ┌────────┐  ┌────────────┐   │
//! │  │ Clipboard │→ │ InputEvent │→ │ Direct │→ │   Typing   │   │
//! │  └───────────┘  └────────────┘  └────────┘  └────────────┘   │
//! │     each: clear → attempt → verify → (volley | next)         │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                  DomElement / Document / Clipboard
//!                              │
//!              browser port  or  virtual_dom (tests, CLI)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use xreply_composer::{ComposerLocator, InsertionChain, InsertionContext};
//!
//! let composer = ComposerLocator::new().wait_for(doc.as_ref(), wait, poll).await?;
//! let ctx = InsertionContext::new(doc, composer.element).with_clipboard(clipboard);
//! let outcome = InsertionChain::standard().insert(&ctx, &reply).await;
//! ```

pub mod chain;
pub mod clear;
pub mod context;
pub mod dom;
pub mod error;
pub mod events;
pub mod extract;
pub mod locator;
pub mod selectors;
pub mod strategies;
pub mod strategy;
pub mod verify;
pub mod virtual_dom;

// Errors
pub use error::{ComposerError, PortError};

// Ports
pub use dom::{Clipboard, Document, DomElement, ElementRef, ElementState, Rect};
pub use events::{EventKind, InputType, SyntheticEvent};

// Locating and extracting
pub use extract::TweetExtractor;
pub use locator::{ComposerLocator, DEFAULT_POLL, DEFAULT_WAIT, LocatedComposer, MatchSource};

// Insertion
pub use chain::{ChainState, InsertionAttempt, InsertionChain, InsertionOutcome, InsertionSuccess};
pub use clear::clear_composer;
pub use context::{InsertionContext, InsertionTimings};
pub use strategies::{
    ClipboardStrategy, DirectWriteStrategy, InputEventStrategy, TypingStrategy,
    write_clipboard_with_retries,
};
pub use strategy::{InsertionMethod, InsertionStrategy};
pub use verify::{VerifiedVia, verify_insertion};

// Virtual DOM
pub use virtual_dom::{MemoryClipboard, ReflectPolicy, ReplyPage, VirtualDocument, VirtualElement};
