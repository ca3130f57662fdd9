//! Insertion strategy trait and types.
//!
//! A strategy is one technique for getting text into the composer so the
//! host editor's internal model notices it. The [`crate::InsertionChain`]
//! tries strategies in order and verifies after each one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::InsertionContext;
use crate::error::ComposerError;

// ============================================================================
// Insertion Method
// ============================================================================

/// The technique a strategy uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertionMethod {
    /// Clipboard write plus a paste event carrying the payload.
    Clipboard,
    /// Content write plus `beforeinput`/`input` events.
    InputEvent,
    /// Direct DOM write with caret placement.
    Direct,
    /// One character at a time with an input event each.
    Typing,
}

impl InsertionMethod {
    /// Returns the identifier used in logs and output.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Clipboard => "clipboard",
            Self::InputEvent => "input-event",
            Self::Direct => "direct",
            Self::Typing => "typing",
        }
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Clipboard => "Clipboard paste",
            Self::InputEvent => "Input event",
            Self::Direct => "Direct DOM write",
            Self::Typing => "Simulated typing",
        }
    }

    /// All methods in chain order.
    pub fn all() -> &'static [InsertionMethod] {
        &[Self::Clipboard, Self::InputEvent, Self::Direct, Self::Typing]
    }
}

impl fmt::Display for InsertionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// Insertion Strategy Trait
// ============================================================================

/// One way of inserting text into the composer.
///
/// The chain clears the composer before calling [`attempt`](Self::attempt)
/// and verifies afterwards, so a strategy only mutates and notifies.
///
/// ```ignore
/// struct PasteStrategy;
///
/// #[async_trait]
/// impl InsertionStrategy for PasteStrategy {
///     fn id(&self) -> &str {
///         "composer.paste"
///     }
///
///     fn method(&self) -> InsertionMethod {
///         InsertionMethod::Clipboard
///     }
///
///     async fn attempt(&self, ctx: &InsertionContext, text: &str) -> Result<bool, ComposerError> {
///         ctx.element.dispatch(&SyntheticEvent::paste(text)).await?;
///         Ok(true)
///     }
/// }
/// ```
#[async_trait]
pub trait InsertionStrategy: Send + Sync {
    /// Unique identifier (e.g. `composer.typing`).
    fn id(&self) -> &str;

    /// The technique used.
    fn method(&self) -> InsertionMethod;

    /// Runs the technique.
    ///
    /// Returns `Ok(true)` when the technique ran to completion and the
    /// result is worth verifying, `Ok(false)` when it declined.
    async fn attempt(&self, ctx: &InsertionContext, text: &str) -> Result<bool, ComposerError>;
}
