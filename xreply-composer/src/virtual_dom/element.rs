//! In-memory elements.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::selector::{SelectorList, SelectorNode};
use crate::dom::{DomElement, ElementRef, ElementState, Rect};
use crate::error::PortError;
use crate::events::{EventKind, InputType, SyntheticEvent};
use crate::selectors::{DRAFT_BLOCK_CLASSES, DRAFT_BLOCK_KEY, PLACEHOLDER_COLORS};
use crate::strategy::InsertionMethod;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Reflect Policy
// ============================================================================

/// Which kinds of synthetic input a simulated rich-text editor accepts.
///
/// Real editors render from an internal model and overwrite DOM changes
/// they did not recognize. The simulated editor does the same: input from
/// a rejected method is reverted to the last accepted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ReflectPolicy {
    /// Accepts paste events carrying a payload.
    pub paste: bool,
    /// Accepts a bulk `insertText` input event.
    pub input_event: bool,
    /// Accepts a direct DOM write followed by `change`.
    pub direct: bool,
    /// Accepts per-character `insertText` input events.
    pub typing: bool,
}

impl ReflectPolicy {
    /// Accepts everything.
    pub const fn all() -> Self {
        Self {
            paste: true,
            input_event: true,
            direct: true,
            typing: true,
        }
    }

    /// Accepts nothing.
    pub const fn never() -> Self {
        Self {
            paste: false,
            input_event: false,
            direct: false,
            typing: false,
        }
    }

    /// Accepts one insertion method only.
    pub fn only(method: InsertionMethod) -> Self {
        let mut policy = Self::never();
        match method {
            InsertionMethod::Clipboard => policy.paste = true,
            InsertionMethod::InputEvent => policy.input_event = true,
            InsertionMethod::Direct => policy.direct = true,
            InsertionMethod::Typing => policy.typing = true,
        }
        policy
    }

    /// Accepts per-character typing only.
    pub fn only_typing() -> Self {
        Self::only(InsertionMethod::Typing)
    }

    /// Accepts paste only.
    pub fn only_paste() -> Self {
        Self::only(InsertionMethod::Clipboard)
    }
}

impl Default for ReflectPolicy {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone)]
struct EditorModel {
    policy: ReflectPolicy,
    committed: String,
    placeholder_mode: bool,
}

// ============================================================================
// Node
// ============================================================================

#[derive(Debug, Default)]
struct Node {
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    rect: Rect,
    text: String,
    children: Vec<Arc<VirtualElement>>,
    disabled: bool,
    read_only: bool,
    tab_index: i32,
    editor: Option<EditorModel>,
    events: Vec<SyntheticEvent>,
    focus_count: u32,
    selected_all: bool,
    attached: bool,
}

impl Node {
    fn style(&self, property: &str, default: &str) -> String {
        self.styles
            .get(property)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn replace_children(&mut self, text: &str) {
        for child in self.children.drain(..) {
            child.mark_detached();
        }
        self.text = text.to_string();
        self.selected_all = false;
    }
}

fn collect_text(node: &Node, rendered_only: bool) -> String {
    if rendered_only && node.style("display", "block") == "none" {
        return String::new();
    }
    let mut out = node.text.clone();
    for child in &node.children {
        out.push_str(&collect_text(&lock(&child.node), rendered_only));
    }
    out
}

fn collect_text_nodes(node: &Node, out: &mut Vec<String>) {
    if !node.text.is_empty() {
        out.push(node.text.clone());
    }
    for child in &node.children {
        collect_text_nodes(&lock(&child.node), out);
    }
}

// ============================================================================
// Virtual Element
// ============================================================================

/// An element of a [`super::VirtualDocument`].
pub struct VirtualElement {
    id: u64,
    tag: String,
    this: Weak<VirtualElement>,
    parent: Mutex<Weak<VirtualElement>>,
    node: Mutex<Node>,
}

impl fmt::Debug for VirtualElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualElement")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

impl VirtualElement {
    /// Starts building an element with the given tag.
    pub fn build(tag: &str) -> ElementBuilder {
        ElementBuilder::new(tag)
    }

    /// Content the simulated editor has accepted, if this is an editor.
    pub fn committed_text(&self) -> Option<String> {
        lock(&self.node).editor.as_ref().map(|e| e.committed.clone())
    }

    /// Every event dispatched on this element, oldest first.
    pub fn events(&self) -> Vec<SyntheticEvent> {
        lock(&self.node).events.clone()
    }

    /// How many times `focus()` was called.
    pub fn focus_count(&self) -> u32 {
        lock(&self.node).focus_count
    }

    /// Current `textContent`, ignoring attachment.
    pub fn text(&self) -> String {
        collect_text(&lock(&self.node), false)
    }

    /// Inline style value.
    pub fn style_value(&self, property: &str) -> Option<String> {
        lock(&self.node).styles.get(property).cloned()
    }

    /// Removes the element from its parent.
    pub fn remove(&self) {
        let parent = lock(&self.parent).upgrade();
        if let Some(parent) = parent {
            lock(&parent.node).children.retain(|c| c.id != self.id);
        }
        self.mark_detached();
    }

    fn mark_detached(&self) {
        *lock(&self.parent) = Weak::new();
        let children = {
            let mut node = lock(&self.node);
            node.attached = false;
            node.children.clone()
        };
        for child in children {
            child.mark_detached();
        }
    }

    fn attached_node(&self) -> Result<MutexGuard<'_, Node>, PortError> {
        let node = lock(&self.node);
        if node.attached {
            Ok(node)
        } else {
            Err(PortError::Detached)
        }
    }

    fn handle(&self) -> Option<Arc<VirtualElement>> {
        self.this.upgrade()
    }

    fn descendants(&self) -> Vec<Arc<VirtualElement>> {
        let children = lock(&self.node).children.clone();
        let mut out = Vec::new();
        for child in children {
            out.push(Arc::clone(&child));
            out.extend(child.descendants());
        }
        out
    }

    pub(crate) fn query_all_concrete(
        &self,
        selector: &str,
        include_self: bool,
    ) -> Result<Vec<Arc<VirtualElement>>, PortError> {
        let list: SelectorList = selector.parse()?;
        let mut candidates = Vec::new();
        if include_self {
            candidates.extend(self.handle());
        }
        candidates.extend(self.descendants());
        Ok(candidates
            .into_iter()
            .filter(|el| list.matches(el))
            .collect())
    }

    /// Applies the editor model to a dispatched event.
    fn reflect(node: &mut Node, event: &SyntheticEvent) {
        let current = collect_text(node, false);
        let Some(editor) = node.editor.as_mut() else {
            return;
        };

        let accept = match (event.kind, event.input_type, event.data.as_deref()) {
            (EventKind::Paste, _, Some(data)) => {
                if editor.policy.paste {
                    let pasted = format!("{current}{data}");
                    editor.committed.clone_from(&pasted);
                    node.replace_children(&pasted);
                }
                return;
            }
            (EventKind::Input, Some(InputType::DeleteContent), _) => true,
            (EventKind::Input, Some(InputType::InsertText), Some(data)) => {
                if current == editor.committed {
                    return;
                }
                if data.chars().count() == 1 && current.ends_with(data) {
                    editor.policy.typing
                } else if current == data {
                    editor.policy.input_event
                } else {
                    return;
                }
            }
            (EventKind::Change, _, _) if current != editor.committed => editor.policy.direct,
            _ => return,
        };

        if accept {
            editor.committed = current;
        } else {
            let committed = editor.committed.clone();
            node.replace_children(&committed);
        }
    }
}

impl SelectorNode for Arc<VirtualElement> {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn attr(&self, name: &str) -> Option<String> {
        lock(&self.node).attributes.get(name).cloned()
    }

    fn parent_node(&self) -> Option<Self> {
        lock(&self.parent).upgrade()
    }
}

fn as_refs(elements: Vec<Arc<VirtualElement>>) -> Vec<ElementRef> {
    elements
        .into_iter()
        .map(|el| el as ElementRef)
        .collect()
}

#[async_trait]
impl DomElement for VirtualElement {
    fn node_id(&self) -> u64 {
        self.id
    }

    async fn state(&self) -> Result<ElementState, PortError> {
        let node = self.attached_node()?;
        let display = node.style("display", "block");
        let color = match &node.editor {
            Some(editor) if editor.placeholder_mode => PLACEHOLDER_COLORS[0].to_string(),
            _ => node.style("color", "rgb(15, 20, 25)"),
        };
        Ok(ElementState {
            tag: self.tag.to_ascii_uppercase(),
            rect: node.rect,
            has_offset_parent: display != "none",
            display,
            visibility: node.style("visibility", "visible"),
            pointer_events: node.style("pointer-events", "auto"),
            color,
            disabled: node.disabled,
            read_only: node.read_only,
            tab_index: node.tab_index,
            content_editable: node.attributes.get("contenteditable").map(String::as_str)
                == Some("true"),
        })
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, PortError> {
        Ok(self.attached_node()?.attributes.get(name).cloned())
    }

    async fn set_attribute(&self, name: &str, value: &str) -> Result<(), PortError> {
        self.attached_node()?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn set_style(&self, property: &str, value: &str) -> Result<(), PortError> {
        self.attached_node()?
            .styles
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    async fn has_class(&self, class: &str) -> Result<bool, PortError> {
        Ok(self
            .attached_node()?
            .attributes
            .get("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class)))
    }

    async fn text_content(&self) -> Result<String, PortError> {
        Ok(collect_text(&*self.attached_node()?, false))
    }

    async fn inner_text(&self) -> Result<String, PortError> {
        Ok(collect_text(&*self.attached_node()?, true))
    }

    async fn value(&self) -> Result<Option<String>, PortError> {
        let node = self.attached_node()?;
        Ok(matches!(self.tag.as_str(), "textarea" | "input").then(|| node.text.clone()))
    }

    async fn text_nodes(&self) -> Result<Vec<String>, PortError> {
        let mut out = Vec::new();
        collect_text_nodes(&*self.attached_node()?, &mut out);
        Ok(out)
    }

    async fn set_text_content(&self, text: &str) -> Result<(), PortError> {
        self.attached_node()?.replace_children(text);
        Ok(())
    }

    async fn clear_html(&self) -> Result<(), PortError> {
        self.attached_node()?.replace_children("");
        Ok(())
    }

    async fn write_draft_block(&self, text: &str) -> Result<(), PortError> {
        let block = VirtualElement::build("div")
            .attr("class", DRAFT_BLOCK_CLASSES)
            .attr("data-offset-key", DRAFT_BLOCK_KEY)
            .child(VirtualElement::build("span").attr("data-text", "true").text(text))
            .finish();
        *lock(&block.parent) = self.this.clone();

        let mut node = self.attached_node()?;
        node.replace_children("");
        node.children.push(block);
        Ok(())
    }

    async fn focus(&self) -> Result<(), PortError> {
        self.attached_node()?.focus_count += 1;
        Ok(())
    }

    async fn click(&self) -> Result<(), PortError> {
        self.attached_node().map(|_| ())
    }

    async fn scroll_into_view(&self) -> Result<(), PortError> {
        self.attached_node().map(|_| ())
    }

    async fn select_all(&self) -> Result<(), PortError> {
        self.attached_node()?.selected_all = true;
        Ok(())
    }

    async fn delete_selection(&self) -> Result<(), PortError> {
        let mut node = self.attached_node()?;
        if node.selected_all {
            node.replace_children("");
            if let Some(editor) = node.editor.as_mut() {
                editor.placeholder_mode = false;
            }
        }
        Ok(())
    }

    async fn collapse_selection_to_end(&self) -> Result<(), PortError> {
        self.attached_node()?.selected_all = false;
        Ok(())
    }

    async fn dispatch(&self, event: &SyntheticEvent) -> Result<bool, PortError> {
        let mut node = self.attached_node()?;
        node.events.push(event.clone());
        Self::reflect(&mut node, event);
        Ok(true)
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>, PortError> {
        drop(self.attached_node()?);
        Ok(as_refs(self.query_all_concrete(selector, false)?))
    }

    async fn closest(&self, selector: &str) -> Result<Option<ElementRef>, PortError> {
        drop(self.attached_node()?);
        let list: SelectorList = selector.parse()?;
        let mut cursor = self.handle();
        while let Some(el) = cursor {
            if list.matches(&el) {
                return Ok(Some(el as ElementRef));
            }
            cursor = el.parent_node();
        }
        Ok(None)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for a [`VirtualElement`] subtree.
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    tag: String,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    rect: Rect,
    text: String,
    children: Vec<ElementBuilder>,
    disabled: bool,
    read_only: bool,
    tab_index: i32,
    editor: Option<EditorModel>,
}

impl ElementBuilder {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            rect: Rect::new(100.0, 20.0),
            text: String::new(),
            children: Vec::new(),
            disabled: false,
            read_only: false,
            tab_index: 0,
            editor: None,
        }
    }

    /// Sets an attribute.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Sets an inline style.
    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.styles.insert(property.to_string(), value.to_string());
        self
    }

    /// Sets the rendered size.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.rect = Rect::new(width, height);
        self
    }

    /// Sets the leading text node.
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Appends a child.
    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Marks the element disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Marks the element read-only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Sets `tabIndex`.
    pub fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = index;
        self
    }

    /// Makes this element a simulated rich-text editor.
    pub fn editor(mut self, policy: ReflectPolicy) -> Self {
        self.attributes
            .insert("contenteditable".to_string(), "true".to_string());
        self.editor = Some(EditorModel {
            policy,
            committed: self.text.clone(),
            placeholder_mode: false,
        });
        self
    }

    /// Keeps reporting the placeholder color until a selection delete.
    pub fn placeholder_sticky(mut self) -> Self {
        if let Some(editor) = self.editor.as_mut() {
            editor.placeholder_mode = true;
        }
        self
    }

    /// Builds the subtree.
    pub fn finish(self) -> Arc<VirtualElement> {
        let children: Vec<_> = self.children.into_iter().map(Self::finish).collect();
        let mut editor = self.editor;
        if let Some(editor) = editor.as_mut() {
            editor.committed.clone_from(&self.text);
        }

        let element = Arc::new_cyclic(|this| VirtualElement {
            id: NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed),
            tag: self.tag,
            this: this.clone(),
            parent: Mutex::new(Weak::new()),
            node: Mutex::new(Node {
                attributes: self.attributes,
                styles: self.styles,
                rect: self.rect,
                text: self.text,
                children: children.clone(),
                disabled: self.disabled,
                read_only: self.read_only,
                tab_index: self.tab_index,
                editor,
                attached: true,
                ..Node::default()
            }),
        });

        for child in &children {
            *lock(&child.parent) = Arc::downgrade(&element);
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(policy: ReflectPolicy) -> Arc<VirtualElement> {
        VirtualElement::build("div")
            .size(400.0, 60.0)
            .editor(policy)
            .finish()
    }

    #[tokio::test]
    async fn test_rejected_bulk_input_reverts() {
        let el = editor(ReflectPolicy::only_typing());
        el.set_text_content("hello world").await.unwrap();
        el.dispatch(&SyntheticEvent::insert_text("hello world"))
            .await
            .unwrap();
        assert_eq!(el.text(), "");
    }

    #[tokio::test]
    async fn test_accepted_typing_commits() {
        let el = editor(ReflectPolicy::only_typing());
        for ch in ["h", "i"] {
            let current = el.text_content().await.unwrap();
            el.set_text_content(&format!("{current}{ch}")).await.unwrap();
            el.dispatch(&SyntheticEvent::insert_text(ch)).await.unwrap();
        }
        assert_eq!(el.text(), "hi");
        assert_eq!(el.committed_text().as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_change_reverts_unless_direct() {
        let el = editor(ReflectPolicy::never());
        el.write_draft_block("hey").await.unwrap();
        assert_eq!(el.text(), "hey");
        el.dispatch(&SyntheticEvent::change()).await.unwrap();
        assert_eq!(el.text(), "");

        let el = editor(ReflectPolicy::only(InsertionMethod::Direct));
        el.write_draft_block("hey").await.unwrap();
        el.dispatch(&SyntheticEvent::change()).await.unwrap();
        assert_eq!(el.committed_text().as_deref(), Some("hey"));
    }

    #[tokio::test]
    async fn test_paste_needs_payload_and_policy() {
        let el = editor(ReflectPolicy::only_paste());
        el.dispatch(&SyntheticEvent::plain(EventKind::Paste))
            .await
            .unwrap();
        assert_eq!(el.text(), "");
        el.dispatch(&SyntheticEvent::paste("yo")).await.unwrap();
        assert_eq!(el.text(), "yo");
    }

    #[tokio::test]
    async fn test_detached_element_errors() {
        let parent = VirtualElement::build("div")
            .child(VirtualElement::build("span").attr("id", "x"))
            .finish();
        let span = parent.query_all_concrete("span", false).unwrap().remove(0);
        span.remove();
        assert_eq!(span.focus().await, Err(PortError::Detached));
        assert!(parent.query_all_concrete("span", false).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closest_includes_self() {
        let root = VirtualElement::build("form")
            .child(VirtualElement::build("div").attr("class", "a b"))
            .finish();
        let div = root.query_all_concrete(".b", false).unwrap().remove(0);
        assert!(div.closest(".a").await.unwrap().is_some());
        let form = div.closest("form").await.unwrap().unwrap();
        assert_eq!(form.node_id(), root.node_id());
    }
}
