//! Composer locator.
//!
//! Finds the live reply input across the markup variants the host page has
//! shipped. Specific selectors are tried first; if none yields a visible,
//! interactable element, every editable region is scanned for one with a
//! composer-like size and context.

use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::dom::{Document, ElementRef, ElementState};
use crate::error::{ComposerError, PortError};
use crate::selectors::{COMPOSER_CONTEXT, COMPOSER_SELECTORS, EDITABLE};

/// Default wait for a composer to appear.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(5);

/// Default interval between searches while waiting.
pub const DEFAULT_POLL: Duration = Duration::from_millis(100);

// ============================================================================
// Located Composer
// ============================================================================

/// How the composer was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    /// Matched the selector at this index.
    Selector(usize),
    /// Matched by the editable-region scan.
    Fallback,
}

/// A composer found on the page.
#[derive(Clone)]
pub struct LocatedComposer {
    /// The element.
    pub element: ElementRef,
    /// How it was found.
    pub source: MatchSource,
}

impl fmt::Debug for LocatedComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocatedComposer")
            .field("node", &self.element.node_id())
            .field("source", &self.source)
            .finish()
    }
}

// ============================================================================
// Composer Locator
// ============================================================================

/// Searches a document for the composer.
#[derive(Debug, Clone)]
pub struct ComposerLocator {
    selectors: Vec<String>,
    min_fallback_width: f64,
    min_fallback_height: f64,
}

impl ComposerLocator {
    /// A locator with the standard selector list.
    pub fn new() -> Self {
        Self {
            selectors: COMPOSER_SELECTORS.iter().map(|s| (*s).to_string()).collect(),
            min_fallback_width: 200.0,
            min_fallback_height: 30.0,
        }
    }

    /// Replaces the selector list.
    pub fn with_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the selectors, most specific first.
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// Searches once.
    ///
    /// # Errors
    ///
    /// Returns a port error if the document cannot be queried at all.
    /// Malformed selectors are skipped.
    #[instrument(skip(self, document))]
    pub async fn find(
        &self,
        document: &dyn Document,
    ) -> Result<Option<LocatedComposer>, PortError> {
        for (index, selector) in self.selectors.iter().enumerate() {
            let candidates = match document.query_all(selector).await {
                Ok(candidates) => candidates,
                Err(PortError::InvalidSelector(s)) => {
                    warn!(selector = %s, "Skipping invalid composer selector");
                    continue;
                }
                Err(error) => return Err(error),
            };

            for element in candidates {
                if usable(&element).await?.is_some() {
                    debug!(selector = %selector, index, "Composer found");
                    return Ok(Some(LocatedComposer {
                        element,
                        source: MatchSource::Selector(index),
                    }));
                }
            }
        }

        self.fallback_scan(document).await
    }

    async fn fallback_scan(
        &self,
        document: &dyn Document,
    ) -> Result<Option<LocatedComposer>, PortError> {
        for element in document.query_all(EDITABLE).await? {
            let Some(state) = usable(&element).await? else {
                continue;
            };
            if state.rect.width <= self.min_fallback_width
                || state.rect.height <= self.min_fallback_height
            {
                continue;
            }

            let in_context = element.closest(COMPOSER_CONTEXT).await?.is_some();
            let labelled = element.attribute("aria-label").await?.is_some();
            if in_context || labelled {
                debug!(node = element.node_id(), "Composer found by fallback scan");
                return Ok(Some(LocatedComposer {
                    element,
                    source: MatchSource::Fallback,
                }));
            }
        }
        Ok(None)
    }

    /// Searches until a composer appears or `timeout` passes.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::NotFound`] when the wait expires.
    #[instrument(skip(self, document))]
    pub async fn wait_for(
        &self,
        document: &dyn Document,
        timeout: Duration,
        poll: Duration,
    ) -> Result<LocatedComposer, ComposerError> {
        let start = Instant::now();
        loop {
            if let Some(found) = self.find(document).await? {
                return Ok(found);
            }
            if start.elapsed() >= timeout {
                let waited_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                warn!(waited_ms, "Composer did not appear");
                return Err(ComposerError::NotFound { waited_ms });
            }
            tokio::time::sleep(poll).await;
        }
    }
}

impl Default for ComposerLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the state if the element is visible and interactable.
async fn usable(element: &ElementRef) -> Result<Option<ElementState>, PortError> {
    match element.state().await {
        Ok(state) if state.is_visible() && state.is_interactable() => Ok(Some(state)),
        Ok(_) | Err(PortError::Detached) => Ok(None),
        Err(error) => Err(error),
    }
}
