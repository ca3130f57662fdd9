//! Clipboard paste strategy.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::context::{InsertionContext, pause};
use crate::dom::Clipboard;
use crate::error::{ComposerError, PortError};
use crate::events::SyntheticEvent;
use crate::strategy::{InsertionMethod, InsertionStrategy};

/// Clipboard writes tried before giving up.
pub const CLIPBOARD_WRITE_ATTEMPTS: u32 = 3;

/// Writes `text` to the clipboard, retrying a refused write.
///
/// # Errors
///
/// Returns the last port error once every attempt was refused.
pub async fn write_clipboard_with_retries(
    clipboard: &dyn Clipboard,
    text: &str,
    retry_delay: Duration,
) -> Result<(), PortError> {
    let mut attempt = 1;
    loop {
        match clipboard.write_text(text).await {
            Ok(()) => return Ok(()),
            Err(error) if attempt < CLIPBOARD_WRITE_ATTEMPTS => {
                debug!(attempt, error = %error, "Clipboard write refused, retrying");
                pause(retry_delay).await;
                attempt += 1;
            }
            Err(error) => {
                warn!(attempts = attempt, error = %error, "Clipboard write failed");
                return Err(error);
            }
        }
    }
}

/// Writes the text to the clipboard and dispatches a paste event carrying it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipboardStrategy;

#[async_trait]
impl InsertionStrategy for ClipboardStrategy {
    fn id(&self) -> &str {
        "composer.clipboard"
    }

    fn method(&self) -> InsertionMethod {
        InsertionMethod::Clipboard
    }

    async fn attempt(&self, ctx: &InsertionContext, text: &str) -> Result<bool, ComposerError> {
        let Some(clipboard) = ctx.clipboard.as_deref() else {
            debug!("No clipboard available");
            return Ok(false);
        };
        write_clipboard_with_retries(clipboard, text, ctx.timings.clipboard_retry).await?;

        ctx.element.focus().await?;
        ctx.element.dispatch(&SyntheticEvent::paste(text)).await?;
        pause(ctx.timings.after_paste).await;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_dom::MemoryClipboard;

    #[tokio::test]
    async fn test_write_retries_then_fails() {
        let clipboard = MemoryClipboard::denied();
        let err = write_clipboard_with_retries(&clipboard, "x", Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Denied(_)));
        assert_eq!(clipboard.write_attempts(), CLIPBOARD_WRITE_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_write_succeeds_first_try() {
        let clipboard = MemoryClipboard::new();
        write_clipboard_with_retries(&clipboard, "copied", Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(clipboard.contents(), "copied");
        assert_eq!(clipboard.write_attempts(), 1);
    }
}
