//! The four insertion strategies, in chain order.
//!
//! - [`ClipboardStrategy`] - Clipboard write plus a paste event
//! - [`InputEventStrategy`] - Content write plus `beforeinput`/`input`
//! - [`DirectWriteStrategy`] - Direct DOM write, editor-block aware
//! - [`TypingStrategy`] - One character at a time

mod clipboard;
mod direct;
mod input_event;
mod typing;

pub use clipboard::{CLIPBOARD_WRITE_ATTEMPTS, ClipboardStrategy, write_clipboard_with_retries};
pub use direct::DirectWriteStrategy;
pub use input_event::InputEventStrategy;
pub use typing::TypingStrategy;
