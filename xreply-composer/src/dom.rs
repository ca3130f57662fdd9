//! DOM port traits.
//!
//! The composer logic never touches a browser directly. It talks to the page
//! through these traits, which a browser bridge (content script, CDP, or the
//! in-memory [`crate::virtual_dom`]) implements.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::error::PortError;
use crate::events::SyntheticEvent;

/// Shared handle to a page element.
pub type ElementRef = Arc<dyn DomElement>;

// ============================================================================
// Element State
// ============================================================================

/// Rendered bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Rendered width in CSS pixels.
    pub width: f64,
    /// Rendered height in CSS pixels.
    pub height: f64,
}

impl Rect {
    /// Creates a rect.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Snapshot of the computed properties the locator filters on.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementState {
    /// Upper-case tag name.
    pub tag: String,
    /// Bounding box.
    pub rect: Rect,
    /// Computed `display`.
    pub display: String,
    /// Computed `visibility`.
    pub visibility: String,
    /// Computed `pointer-events`.
    pub pointer_events: String,
    /// Computed text `color`.
    pub color: String,
    /// `disabled` property.
    pub disabled: bool,
    /// `readOnly` property.
    pub read_only: bool,
    /// `tabIndex` property.
    pub tab_index: i32,
    /// `isContentEditable` property.
    pub content_editable: bool,
    /// Whether the element has an offset parent.
    pub has_offset_parent: bool,
}

impl ElementState {
    /// Non-zero size and not hidden by CSS.
    pub fn is_visible(&self) -> bool {
        self.rect.width > 0.0
            && self.rect.height > 0.0
            && self.visibility != "hidden"
            && self.display != "none"
    }

    /// Accepts pointer and keyboard focus.
    pub fn is_interactable(&self) -> bool {
        self.pointer_events != "none" && !self.disabled && !self.read_only && self.tab_index != -1
    }

    /// A rendered editable region or text area.
    pub fn is_editable(&self) -> bool {
        self.content_editable || (self.tag == "TEXTAREA" && self.has_offset_parent)
    }
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            tag: "DIV".to_string(),
            rect: Rect::default(),
            display: "block".to_string(),
            visibility: "visible".to_string(),
            pointer_events: "auto".to_string(),
            color: "rgb(15, 20, 25)".to_string(),
            disabled: false,
            read_only: false,
            tab_index: 0,
            content_editable: false,
            has_offset_parent: true,
        }
    }
}

// ============================================================================
// Element Port
// ============================================================================

/// One element of the host page.
#[async_trait]
pub trait DomElement: Send + Sync + fmt::Debug {
    /// Stable identity within the document.
    fn node_id(&self) -> u64;

    /// Computed state used for visibility and interactability checks.
    async fn state(&self) -> Result<ElementState, PortError>;

    /// Reads an attribute.
    async fn attribute(&self, name: &str) -> Result<Option<String>, PortError>;

    /// Writes an attribute.
    async fn set_attribute(&self, name: &str, value: &str) -> Result<(), PortError>;

    /// Writes one inline style property.
    async fn set_style(&self, property: &str, value: &str) -> Result<(), PortError>;

    /// Returns true if `class` is in the class list.
    async fn has_class(&self, class: &str) -> Result<bool, PortError>;

    /// `textContent`
    async fn text_content(&self) -> Result<String, PortError>;

    /// `innerText`
    async fn inner_text(&self) -> Result<String, PortError>;

    /// `value` for form controls, `None` otherwise.
    async fn value(&self) -> Result<Option<String>, PortError>;

    /// The element's text nodes in document order.
    async fn text_nodes(&self) -> Result<Vec<String>, PortError>;

    /// Replaces all children with one text node.
    async fn set_text_content(&self, text: &str) -> Result<(), PortError>;

    /// Sets `innerHTML` to the empty string.
    async fn clear_html(&self) -> Result<(), PortError>;

    /// Replaces the children with a single rich-text editor block holding
    /// `text`.
    async fn write_draft_block(&self, text: &str) -> Result<(), PortError>;

    /// `focus()`
    async fn focus(&self) -> Result<(), PortError>;

    /// `click()`
    async fn click(&self) -> Result<(), PortError>;

    /// `scrollIntoView({block: "center"})`
    async fn scroll_into_view(&self) -> Result<(), PortError>;

    /// Selects the element's whole contents.
    async fn select_all(&self) -> Result<(), PortError>;

    /// `document.execCommand("delete")` on the current selection.
    async fn delete_selection(&self) -> Result<(), PortError>;

    /// Collapses the selection to the end of the contents.
    async fn collapse_selection_to_end(&self) -> Result<(), PortError>;

    /// Dispatches an event; returns false if a listener cancelled it.
    async fn dispatch(&self, event: &SyntheticEvent) -> Result<bool, PortError>;

    /// First descendant matching `selector`.
    async fn query(&self, selector: &str) -> Result<Option<ElementRef>, PortError> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    /// All descendants matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>, PortError>;

    /// The element itself or its nearest ancestor matching `selector`.
    async fn closest(&self, selector: &str) -> Result<Option<ElementRef>, PortError>;
}

// ============================================================================
// Document Port
// ============================================================================

/// The host page document.
#[async_trait]
pub trait Document: Send + Sync {
    /// All elements matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>, PortError>;

    /// First element matching `selector`.
    async fn query(&self, selector: &str) -> Result<Option<ElementRef>, PortError> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }
}

// ============================================================================
// Clipboard Port
// ============================================================================

/// The system clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// `navigator.clipboard.writeText`
    async fn write_text(&self, text: &str) -> Result<(), PortError>;

    /// `navigator.clipboard.readText`
    async fn read_text(&self) -> Result<String, PortError>;
}
