//! Clearing the composer.
//!
//! The editor keeps its own model of the content, so blanking the DOM is not
//! enough. The routine deletes through the selection, blanks the DOM as a
//! fallback, forces the editor out of placeholder mode, and finishes with a
//! backspace key pair.

use tracing::{debug, instrument};

use crate::context::{InsertionContext, pause};
use crate::dom::{Document, ElementRef};
use crate::error::PortError;
use crate::events::{SyntheticEvent, clear_notifications};
use crate::selectors::{
    DRAFT_BLOCK, DRAFT_CONTENT, DRAFT_CONTENT_CLASS, DRAFT_PLACEHOLDER, PLACEHOLDER_COLORS,
};

/// Hides the editor's placeholder overlays.
pub(crate) async fn hide_placeholders(document: &dyn Document) -> Result<(), PortError> {
    for placeholder in document.query_all(DRAFT_PLACEHOLDER).await? {
        placeholder.set_style("display", "none").await?;
    }
    Ok(())
}

/// The editor content root at or inside `element`.
async fn editor_root(element: &ElementRef) -> Result<ElementRef, PortError> {
    if element.has_class(DRAFT_CONTENT_CLASS).await? {
        return Ok(element.clone());
    }
    Ok(element
        .query(DRAFT_CONTENT)
        .await?
        .unwrap_or_else(|| element.clone()))
}

/// Empties the composer. Failures are logged and swallowed; the next
/// verification decides whether the attempt worked.
#[instrument(skip(ctx), fields(node = ctx.element.node_id()))]
pub async fn clear_composer(ctx: &InsertionContext) {
    if let Err(error) = try_clear(ctx).await {
        debug!(error = %error, "Clear routine stopped early");
    }
}

async fn try_clear(ctx: &InsertionContext) -> Result<(), PortError> {
    let timings = &ctx.timings;

    hide_placeholders(ctx.document.as_ref()).await?;
    let target = editor_root(&ctx.element).await?;

    target.focus().await?;
    pause(timings.clear_step).await;

    target.select_all().await?;
    target.set_text_content("").await?;
    target.dispatch(&SyntheticEvent::delete_content()).await?;
    pause(timings.clear_step).await;

    target.clear_html().await?;
    target.set_text_content("").await?;

    if let Some(block) = target.query(DRAFT_BLOCK).await? {
        block.set_text_content("").await?;
    }

    let color = target.state().await?.color;
    if PLACEHOLDER_COLORS.contains(&color.as_str()) {
        debug!(color = %color, "Composer still in placeholder mode");
        target.set_text_content(" ").await?;
        pause(timings.placeholder_roundtrip).await;
        target.select_all().await?;
        target.delete_selection().await?;
        target.set_text_content("").await?;
    }

    target.set_attribute("data-text", "").await?;

    for event in clear_notifications() {
        target.dispatch(&event).await?;
        pause(timings.clear_event_gap).await;
    }

    target.focus().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::InsertionTimings;
    use crate::dom::DomElement;
    use crate::events::EventKind;
    use crate::virtual_dom::{ReflectPolicy, ReplyPage};
    use std::sync::Arc;

    fn context(page: &ReplyPage) -> (InsertionContext, Arc<crate::VirtualElement>) {
        let doc = page.build();
        let editor = doc.find(r#"[data-testid="tweetTextarea_0"]"#).unwrap();
        let ctx = InsertionContext::new(doc, editor.clone())
            .with_timings(InsertionTimings::immediate());
        (ctx, editor)
    }

    #[tokio::test]
    async fn test_clear_empties_and_commits() {
        let (ctx, editor) = context(&ReplyPage::new("hi").with_policy(ReflectPolicy::all()));
        editor.set_text_content("stale draft").await.unwrap();
        editor.dispatch(&SyntheticEvent::change()).await.unwrap();
        assert_eq!(editor.committed_text().as_deref(), Some("stale draft"));

        clear_composer(&ctx).await;

        assert_eq!(editor.text(), "");
        assert_eq!(editor.committed_text().as_deref(), Some(""));
        assert_eq!(editor.attribute("data-text").await.unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_clear_ends_with_backspace() {
        let (ctx, editor) = context(&ReplyPage::new("hi"));
        clear_composer(&ctx).await;

        let events = editor.events();
        let last = events.last().unwrap();
        assert_eq!(last.kind, EventKind::KeyUp);
        assert_eq!(last.key.as_deref(), Some("Backspace"));
    }

    #[tokio::test]
    async fn test_clear_drops_placeholder_mode() {
        let (ctx, editor) = context(&ReplyPage::new("hi").with_sticky_placeholder());
        assert!(PLACEHOLDER_COLORS.contains(&editor.state().await.unwrap().color.as_str()));

        clear_composer(&ctx).await;

        assert!(!PLACEHOLDER_COLORS.contains(&editor.state().await.unwrap().color.as_str()));
        assert_eq!(editor.text(), "");
    }

    #[tokio::test]
    async fn test_clear_hides_placeholder_overlay() {
        let page = ReplyPage::new("hi");
        let (ctx, _) = context(&page);
        clear_composer(&ctx).await;

        let doc = ctx.document.clone();
        let overlay = doc.query(".public-DraftEditorPlaceholder-root").await.unwrap().unwrap();
        assert_eq!(overlay.state().await.unwrap().display, "none");
    }

    #[tokio::test]
    async fn test_clear_swallows_detached_errors() {
        let (ctx, editor) = context(&ReplyPage::new("hi"));
        editor.remove();
        clear_composer(&ctx).await;
    }
}
