//! Structured input-event strategy.

use async_trait::async_trait;

use crate::context::{InsertionContext, pause};
use crate::error::ComposerError;
use crate::events::SyntheticEvent;
use crate::strategy::{InsertionMethod, InsertionStrategy};

/// Sets the content, then announces it with `beforeinput` and `input`
/// events of type `insertText`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputEventStrategy;

#[async_trait]
impl InsertionStrategy for InputEventStrategy {
    fn id(&self) -> &str {
        "composer.input_event"
    }

    fn method(&self) -> InsertionMethod {
        InsertionMethod::InputEvent
    }

    async fn attempt(&self, ctx: &InsertionContext, text: &str) -> Result<bool, ComposerError> {
        let element = &ctx.element;
        element.focus().await?;
        pause(ctx.timings.after_focus).await;

        element.set_text_content(text).await?;
        element
            .dispatch(&SyntheticEvent::before_insert_text(text))
            .await?;
        element.dispatch(&SyntheticEvent::insert_text(text)).await?;

        pause(ctx.timings.after_input).await;
        Ok(true)
    }
}
