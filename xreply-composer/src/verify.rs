//! Post-insertion verification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::context::pause;
use crate::dom::ElementRef;
use crate::error::PortError;
use crate::selectors::DRAFT_BLOCK;

/// Where the expected text was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerifiedVia {
    /// `textContent`
    TextContent,
    /// `innerText`
    InnerText,
    /// Form control `value`.
    Value,
    /// The rich-text editor's block element.
    DraftBlock,
}

impl fmt::Display for VerifiedVia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TextContent => "textContent",
            Self::InnerText => "innerText",
            Self::Value => "value",
            Self::DraftBlock => "draft block",
        })
    }
}

/// Waits `settle`, then checks whether `expected` is present in the
/// composer. Checks run in order and the first hit wins.
pub async fn verify_insertion(
    element: &ElementRef,
    expected: &str,
    settle: Duration,
) -> Option<VerifiedVia> {
    pause(settle).await;
    match check(element, expected).await {
        Ok(found) => found,
        Err(error) => {
            debug!(error = %error, "Verification could not read the composer");
            None
        }
    }
}

async fn check(element: &ElementRef, expected: &str) -> Result<Option<VerifiedVia>, PortError> {
    if element.text_content().await?.contains(expected) {
        return Ok(Some(VerifiedVia::TextContent));
    }
    if element.inner_text().await?.contains(expected) {
        return Ok(Some(VerifiedVia::InnerText));
    }
    if element
        .value()
        .await?
        .is_some_and(|value| value.contains(expected))
    {
        return Ok(Some(VerifiedVia::Value));
    }
    if let Some(block) = element.query(DRAFT_BLOCK).await? {
        if block.text_content().await?.contains(expected) {
            return Ok(Some(VerifiedVia::DraftBlock));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomElement;
    use crate::virtual_dom::VirtualElement;

    #[tokio::test]
    async fn test_text_content_wins() {
        let el: ElementRef = VirtualElement::build("div").text("hello there").finish();
        assert_eq!(
            verify_insertion(&el, "hello", Duration::ZERO).await,
            Some(VerifiedVia::TextContent)
        );
        assert_eq!(verify_insertion(&el, "bye", Duration::ZERO).await, None);
    }

    #[tokio::test]
    async fn test_draft_block_text_is_found() {
        let el: ElementRef = VirtualElement::build("div").finish();
        el.write_draft_block("from the block").await.unwrap();
        assert_eq!(
            verify_insertion(&el, "from the block", Duration::ZERO).await,
            Some(VerifiedVia::TextContent)
        );
    }

    #[tokio::test]
    async fn test_detached_is_unverified() {
        let parent = VirtualElement::build("div")
            .child(VirtualElement::build("p").text("gone"))
            .finish();
        let child = parent.query("p").await.unwrap().unwrap();
        parent.clear_html().await.unwrap();
        assert_eq!(verify_insertion(&child, "gone", Duration::ZERO).await, None);
    }
}
