//! Simulated typing strategy.

use async_trait::async_trait;
use tracing::debug;

use crate::context::{InsertionContext, pause};
use crate::error::ComposerError;
use crate::events::SyntheticEvent;
use crate::strategy::{InsertionMethod, InsertionStrategy};

/// Appends one character at a time, each followed by an `insertText` input
/// event and a short delay. Slowest, but accepted by the most editors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypingStrategy;

#[async_trait]
impl InsertionStrategy for TypingStrategy {
    fn id(&self) -> &str {
        "composer.typing"
    }

    fn method(&self) -> InsertionMethod {
        InsertionMethod::Typing
    }

    async fn attempt(&self, ctx: &InsertionContext, text: &str) -> Result<bool, ComposerError> {
        let element = &ctx.element;
        element.focus().await?;
        pause(ctx.timings.after_focus).await;

        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let ch: &str = ch.encode_utf8(&mut buf);
            let current = element.text_content().await?;
            element.set_text_content(&format!("{current}{ch}")).await?;
            element.dispatch(&SyntheticEvent::insert_text(ch)).await?;

            let delay = ctx.timings.typing.sample(&mut rand::thread_rng());
            pause(delay).await;
        }

        debug!(chars = text.chars().count(), "Typed text");
        pause(ctx.timings.after_typing).await;
        Ok(true)
    }
}
