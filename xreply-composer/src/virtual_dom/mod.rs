//! In-memory DOM.
//!
//! A small document model with a simulated rich-text editor. It backs the
//! composer tests and the `xreply simulate` command, and doubles as the
//! reference for what a browser port has to provide.
//!
//! - [`VirtualDocument`] - Document root implementing [`Document`]
//! - [`VirtualElement`] - Element tree implementing [`crate::DomElement`]
//! - [`ReflectPolicy`] - Which synthetic input the simulated editor accepts
//! - [`MemoryClipboard`] - Clipboard implementing [`Clipboard`]
//! - [`ReplyPage`] - A reply page with one tweet and its composer

mod element;
mod page;
mod selector;

pub use element::{ElementBuilder, ReflectPolicy, VirtualElement};
pub use page::ReplyPage;

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::dom::{Clipboard, Document, ElementRef};
use crate::error::PortError;

// ============================================================================
// Virtual Document
// ============================================================================

/// A document holding one element tree.
#[derive(Debug, Clone)]
pub struct VirtualDocument {
    root: Arc<VirtualElement>,
}

impl VirtualDocument {
    /// Creates a document whose `<html>` element holds `body`.
    pub fn new(body: ElementBuilder) -> Self {
        Self {
            root: VirtualElement::build("html").child(body).finish(),
        }
    }

    /// The `<html>` element.
    pub fn root(&self) -> &Arc<VirtualElement> {
        &self.root
    }

    /// First element matching `selector`, as the concrete type.
    pub fn find(&self, selector: &str) -> Option<Arc<VirtualElement>> {
        self.root
            .query_all_concrete(selector, true)
            .ok()?
            .into_iter()
            .next()
    }
}

#[async_trait]
impl Document for VirtualDocument {
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>, PortError> {
        Ok(self
            .root
            .query_all_concrete(selector, true)?
            .into_iter()
            .map(|el| el as ElementRef)
            .collect())
    }
}

// ============================================================================
// Memory Clipboard
// ============================================================================

/// Clipboard kept in memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<String>,
    denied: AtomicBool,
    writes: AtomicU32,
}

impl MemoryClipboard {
    /// Creates an empty, writable clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clipboard that refuses every access.
    pub fn denied() -> Self {
        let clipboard = Self::default();
        clipboard.denied.store(true, Ordering::SeqCst);
        clipboard
    }

    /// Current contents.
    pub fn contents(&self) -> String {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of write attempts, including refused ones.
    pub fn write_attempts(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), PortError> {
        if self.denied.load(Ordering::SeqCst) {
            Err(PortError::Denied("clipboard access blocked".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), PortError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = text.to_string();
        Ok(())
    }

    async fn read_text(&self) -> Result<String, PortError> {
        self.check()?;
        Ok(self.contents())
    }
}
