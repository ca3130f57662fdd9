//! Insertion context.

use std::sync::Arc;
use std::time::Duration;
use xreply_core::TypingDelay;

use crate::dom::{Clipboard, Document, ElementRef};

/// Pauses that give the host page's own handlers time to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionTimings {
    /// After scrolling the composer into view.
    pub after_scroll: Duration,
    /// After the initial focus and click.
    pub after_click: Duration,
    /// After the clear routine, before a strategy runs.
    pub after_clear: Duration,
    /// After a strategy focuses the composer.
    pub after_focus: Duration,
    /// Between steps of the clear routine.
    pub clear_step: Duration,
    /// Between the clear routine's notification events.
    pub clear_event_gap: Duration,
    /// During the placeholder insert-then-delete roundtrip.
    pub placeholder_roundtrip: Duration,
    /// Between clipboard write retries.
    pub clipboard_retry: Duration,
    /// After dispatching the paste event.
    pub after_paste: Duration,
    /// After dispatching the input events.
    pub after_input: Duration,
    /// After a direct write.
    pub after_direct: Duration,
    /// After the last typed character.
    pub after_typing: Duration,
    /// Per-character typing delay.
    pub typing: TypingDelay,
    /// Before checking the composer's content.
    pub before_verify: Duration,
    /// Between failed strategies.
    pub between_methods: Duration,
    /// Between events of the recognition volley.
    pub volley_gap: Duration,
    /// Before the volley's final input event.
    pub volley_settle: Duration,
}

impl InsertionTimings {
    /// No pauses at all.
    pub fn immediate() -> Self {
        Self {
            after_scroll: Duration::ZERO,
            after_click: Duration::ZERO,
            after_clear: Duration::ZERO,
            after_focus: Duration::ZERO,
            clear_step: Duration::ZERO,
            clear_event_gap: Duration::ZERO,
            placeholder_roundtrip: Duration::ZERO,
            clipboard_retry: Duration::ZERO,
            after_paste: Duration::ZERO,
            after_input: Duration::ZERO,
            after_direct: Duration::ZERO,
            after_typing: Duration::ZERO,
            typing: TypingDelay::ZERO,
            before_verify: Duration::ZERO,
            between_methods: Duration::ZERO,
            volley_gap: Duration::ZERO,
            volley_settle: Duration::ZERO,
        }
    }

    /// Sets the per-character typing delay.
    pub fn with_typing_delay(mut self, delay: TypingDelay) -> Self {
        self.typing = delay;
        self
    }
}

impl Default for InsertionTimings {
    fn default() -> Self {
        Self {
            after_scroll: Duration::from_millis(100),
            after_click: Duration::from_millis(300),
            after_clear: Duration::from_millis(200),
            after_focus: Duration::from_millis(100),
            clear_step: Duration::from_millis(100),
            clear_event_gap: Duration::from_millis(10),
            placeholder_roundtrip: Duration::from_millis(50),
            clipboard_retry: Duration::from_millis(100),
            after_paste: Duration::from_millis(500),
            after_input: Duration::from_millis(300),
            after_direct: Duration::from_millis(200),
            after_typing: Duration::from_millis(200),
            typing: TypingDelay::from_millis(10, 0),
            before_verify: Duration::from_millis(300),
            between_methods: Duration::from_millis(200),
            volley_gap: Duration::from_millis(5),
            volley_settle: Duration::from_millis(50),
        }
    }
}

/// Everything a strategy needs to act on the composer.
#[derive(Clone)]
pub struct InsertionContext {
    /// The page.
    pub document: Arc<dyn Document>,
    /// The located composer.
    pub element: ElementRef,
    /// System clipboard, when the page may use it.
    pub clipboard: Option<Arc<dyn Clipboard>>,
    /// Pauses.
    pub timings: InsertionTimings,
}

impl InsertionContext {
    /// Creates a context with default timings and no clipboard.
    pub fn new(document: Arc<dyn Document>, element: ElementRef) -> Self {
        Self {
            document,
            element,
            clipboard: None,
            timings: InsertionTimings::default(),
        }
    }

    /// Sets the clipboard.
    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    /// Sets the timings.
    pub fn with_timings(mut self, timings: InsertionTimings) -> Self {
        self.timings = timings;
        self
    }
}

impl std::fmt::Debug for InsertionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsertionContext")
            .field("element", &self.element)
            .field("clipboard", &self.clipboard.is_some())
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}

/// Sleeps unless `duration` is zero.
pub(crate) async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
