//! Direct DOM write strategy.

use async_trait::async_trait;
use tracing::debug;

use crate::clear::hide_placeholders;
use crate::context::{InsertionContext, pause};
use crate::error::ComposerError;
use crate::events::SyntheticEvent;
use crate::selectors::DRAFT_CONTENT;
use crate::strategy::{InsertionMethod, InsertionStrategy};

/// Writes the text straight into the DOM and parks the caret at the end.
///
/// The rich-text editor renders from block elements, so inside one the
/// strategy builds a block holding the text instead of a flat text node.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectWriteStrategy;

#[async_trait]
impl InsertionStrategy for DirectWriteStrategy {
    fn id(&self) -> &str {
        "composer.direct"
    }

    fn method(&self) -> InsertionMethod {
        InsertionMethod::Direct
    }

    async fn attempt(&self, ctx: &InsertionContext, text: &str) -> Result<bool, ComposerError> {
        let element = &ctx.element;
        element.focus().await?;
        pause(ctx.timings.after_focus).await;

        match element.closest(DRAFT_CONTENT).await? {
            Some(editor) => {
                debug!("Writing an editor block");
                editor.write_draft_block(text).await?;
                hide_placeholders(ctx.document.as_ref()).await?;
                editor.collapse_selection_to_end().await?;
            }
            None => {
                element.set_text_content(text).await?;
                element.collapse_selection_to_end().await?;
            }
        }

        element.dispatch(&SyntheticEvent::change()).await?;
        pause(ctx.timings.after_direct).await;
        Ok(true)
    }
}
