//! Synthetic DOM events.
//!
//! The host editor only updates its internal model when it sees events that
//! look like user input. These types describe the events the strategies
//! dispatch; ports translate them into real browser events.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Event Kind
// ============================================================================

/// DOM event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// `focus`
    Focus,
    /// `focusin`
    FocusIn,
    /// `input`
    Input,
    /// `beforeinput`
    BeforeInput,
    /// `compositionstart`
    CompositionStart,
    /// `compositionupdate`
    CompositionUpdate,
    /// `compositionend`
    CompositionEnd,
    /// `keydown`
    KeyDown,
    /// `keypress`
    KeyPress,
    /// `keyup`
    KeyUp,
    /// `textInput`
    TextInput,
    /// `change`
    Change,
    /// `paste`
    Paste,
    /// `cut`
    Cut,
    /// `select`
    Select,
}

impl EventKind {
    /// Returns the DOM event name.
    pub fn dom_name(&self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::FocusIn => "focusin",
            Self::Input => "input",
            Self::BeforeInput => "beforeinput",
            Self::CompositionStart => "compositionstart",
            Self::CompositionUpdate => "compositionupdate",
            Self::CompositionEnd => "compositionend",
            Self::KeyDown => "keydown",
            Self::KeyPress => "keypress",
            Self::KeyUp => "keyup",
            Self::TextInput => "textInput",
            Self::Change => "change",
            Self::Paste => "paste",
            Self::Cut => "cut",
            Self::Select => "select",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_name())
    }
}

/// `inputType` of an input or beforeinput event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputType {
    /// `insertText`
    #[serde(rename = "insertText")]
    InsertText,
    /// `deleteContent`
    #[serde(rename = "deleteContent")]
    DeleteContent,
}

impl InputType {
    /// Returns the DOM `inputType` value.
    pub fn dom_name(&self) -> &'static str {
        match self {
            Self::InsertText => "insertText",
            Self::DeleteContent => "deleteContent",
        }
    }
}

// ============================================================================
// Synthetic Event
// ============================================================================

/// Key reported by IME-style synthetic key events.
pub const UNIDENTIFIED_KEY: &str = "Unidentified";

/// Key code reported while an IME is composing.
pub const IME_KEY_CODE: u32 = 229;

/// An event to dispatch on the composer.
///
/// All synthetic events bubble and are cancelable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticEvent {
    /// Event type.
    pub kind: EventKind,
    /// `inputType` for input events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    /// Event data, or the `text/plain` payload of a paste.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// `key` for keyboard events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// `keyCode` for keyboard events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_code: Option<u32>,
}

impl SyntheticEvent {
    /// A bare event of the given kind.
    pub fn plain(kind: EventKind) -> Self {
        Self {
            kind,
            input_type: None,
            data: None,
            key: None,
            key_code: None,
        }
    }

    /// `focus`
    pub fn focus() -> Self {
        Self::plain(EventKind::Focus)
    }

    /// `change`
    pub fn change() -> Self {
        Self::plain(EventKind::Change)
    }

    /// `input` with `inputType: insertText`.
    pub fn insert_text(data: impl Into<String>) -> Self {
        Self {
            input_type: Some(InputType::InsertText),
            data: Some(data.into()),
            ..Self::plain(EventKind::Input)
        }
    }

    /// `beforeinput` with `inputType: insertText`.
    pub fn before_insert_text(data: impl Into<String>) -> Self {
        Self {
            input_type: Some(InputType::InsertText),
            data: Some(data.into()),
            ..Self::plain(EventKind::BeforeInput)
        }
    }

    /// `input` with `inputType: deleteContent`.
    pub fn delete_content() -> Self {
        Self {
            input_type: Some(InputType::DeleteContent),
            ..Self::plain(EventKind::Input)
        }
    }

    /// `paste` carrying a `text/plain` payload.
    pub fn paste(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::plain(EventKind::Paste)
        }
    }

    /// A keyboard event.
    pub fn key(kind: EventKind, key: impl Into<String>, key_code: u32) -> Self {
        Self {
            key: Some(key.into()),
            key_code: Some(key_code),
            ..Self::plain(kind)
        }
    }

    /// A composition or textInput event with data.
    pub fn with_data(kind: EventKind, data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::plain(kind)
        }
    }

    /// Returns true if this is an `insertText` input event.
    pub fn is_insert_text(&self) -> bool {
        self.kind == EventKind::Input && self.input_type == Some(InputType::InsertText)
    }
}

// ============================================================================
// Event Sequences
// ============================================================================

/// Events dispatched after a verified insertion so the host page enables
/// its submit control.
pub fn recognition_volley(text: &str) -> Vec<SyntheticEvent> {
    vec![
        SyntheticEvent::focus(),
        SyntheticEvent::plain(EventKind::FocusIn),
        SyntheticEvent::insert_text(text),
        SyntheticEvent::before_insert_text(text),
        SyntheticEvent::with_data(EventKind::CompositionStart, ""),
        SyntheticEvent::with_data(EventKind::CompositionUpdate, text),
        SyntheticEvent::with_data(EventKind::CompositionEnd, text),
        SyntheticEvent::key(EventKind::KeyDown, UNIDENTIFIED_KEY, IME_KEY_CODE),
        SyntheticEvent::key(EventKind::KeyPress, UNIDENTIFIED_KEY, IME_KEY_CODE),
        SyntheticEvent::key(EventKind::KeyUp, UNIDENTIFIED_KEY, IME_KEY_CODE),
        SyntheticEvent::with_data(EventKind::TextInput, text),
        SyntheticEvent::change(),
        SyntheticEvent::plain(EventKind::Paste),
        SyntheticEvent::plain(EventKind::Cut),
        SyntheticEvent::plain(EventKind::Select),
    ]
}

/// Events dispatched after a clear so the editor drops its old content.
pub fn clear_notifications() -> Vec<SyntheticEvent> {
    vec![
        SyntheticEvent::focus(),
        SyntheticEvent::plain(EventKind::Input),
        SyntheticEvent::change(),
        SyntheticEvent::key(EventKind::KeyDown, "Backspace", 8),
        SyntheticEvent::key(EventKind::KeyUp, "Backspace", 8),
    ]
}
