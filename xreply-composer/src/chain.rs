//! Insertion chain for trying strategies in order.
//!
//! The chain prepares the composer once, then for each strategy: clears,
//! attempts, and verifies. The first verified strategy wins and the chain
//! finishes with an event volley so the host page enables its submit
//! control.

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::clear::clear_composer;
use crate::context::{InsertionContext, pause};
use crate::error::ComposerError;
use crate::events::{SyntheticEvent, recognition_volley};
use crate::strategies::{
    ClipboardStrategy, DirectWriteStrategy, InputEventStrategy, TypingStrategy,
};
use crate::strategy::{InsertionMethod, InsertionStrategy};
use crate::verify::{VerifiedVia, verify_insertion};

// ============================================================================
// Chain State
// ============================================================================

/// States the chain passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// Nothing attempted yet.
    Idle,
    /// Clearing before a strategy.
    Clearing,
    /// Running strategy `i`.
    Attempting(usize),
    /// Checking the result of strategy `i`.
    Verifying(usize),
    /// Strategy `i` verified.
    Succeeded(usize),
    /// No strategy verified.
    Exhausted,
}

// ============================================================================
// Insertion Attempt
// ============================================================================

/// Record of a single strategy attempt.
#[derive(Debug, Clone)]
pub struct InsertionAttempt {
    /// The strategy ID that was attempted.
    pub strategy_id: String,
    /// The technique used.
    pub method: InsertionMethod,
    /// Whether the strategy ran to completion.
    pub handled: bool,
    /// Where the text was found, if it was.
    pub verified: Option<VerifiedVia>,
    /// Error if the strategy failed.
    pub error: Option<String>,
    /// How long the attempt took.
    pub duration: Duration,
}

impl InsertionAttempt {
    /// Returns true if the attempt was verified.
    pub fn is_success(&self) -> bool {
        self.verified.is_some()
    }
}

// ============================================================================
// Insertion Outcome
// ============================================================================

/// A verified insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionSuccess {
    /// Strategy that verified.
    pub strategy_id: String,
    /// Its technique.
    pub method: InsertionMethod,
    /// Where the text was found.
    pub verified_via: VerifiedVia,
}

/// The outcome of an insertion chain execution.
#[derive(Debug)]
pub struct InsertionOutcome {
    /// The result (success or final error).
    pub result: Result<InsertionSuccess, ComposerError>,
    /// All attempts made.
    pub attempts: Vec<InsertionAttempt>,
    /// States visited, in order.
    pub transitions: Vec<ChainState>,
    /// Total duration.
    pub duration: Duration,
}

impl InsertionOutcome {
    /// Returns true if the insertion verified.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the number of strategies that were tried.
    pub fn attempts_count(&self) -> usize {
        self.attempts.len()
    }

    /// Returns the technique that verified, if any.
    pub fn successful_method(&self) -> Option<InsertionMethod> {
        self.result.as_ref().ok().map(|s| s.method)
    }

    /// Returns all errors that occurred.
    pub fn errors(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref())
            .collect()
    }

    /// Returns the final state.
    pub fn final_state(&self) -> ChainState {
        self.transitions.last().copied().unwrap_or(ChainState::Idle)
    }
}

// ============================================================================
// Insertion Chain
// ============================================================================

/// Strategies tried strictly in order, never concurrently.
pub struct InsertionChain {
    strategies: Vec<Box<dyn InsertionStrategy>>,
}

impl InsertionChain {
    /// The four strategies in their standard order.
    pub fn standard() -> Self {
        Self::with_strategies(vec![
            Box::new(ClipboardStrategy),
            Box::new(InputEventStrategy),
            Box::new(DirectWriteStrategy),
            Box::new(TypingStrategy),
        ])
    }

    /// A chain with the given strategies, kept in the given order.
    pub fn with_strategies(strategies: Vec<Box<dyn InsertionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Returns the number of strategies in the chain.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Returns the techniques in order.
    pub fn methods(&self) -> Vec<InsertionMethod> {
        self.strategies.iter().map(|s| s.method()).collect()
    }

    /// Inserts `text` into the composer.
    #[instrument(skip(self, ctx, text), fields(strategies = self.strategies.len(), chars = text.chars().count()))]
    pub async fn insert(&self, ctx: &InsertionContext, text: &str) -> InsertionOutcome {
        let start = Instant::now();
        let mut attempts = Vec::with_capacity(self.strategies.len());
        let mut transitions = vec![ChainState::Idle];

        let finish = |result, attempts, transitions| InsertionOutcome {
            result,
            attempts,
            transitions,
            duration: start.elapsed(),
        };

        if text.trim().is_empty() {
            return finish(Err(ComposerError::EmptyText), attempts, transitions);
        }

        if let Err(error) = prepare(ctx).await {
            warn!(error = %error, "Composer could not be prepared");
            return finish(Err(error.into()), attempts, transitions);
        }

        info!(count = self.strategies.len(), "Executing insertion chain");

        for (index, strategy) in self.strategies.iter().enumerate() {
            let strategy_id = strategy.id();
            let method = strategy.method();
            let attempt_start = Instant::now();

            transitions.push(ChainState::Clearing);
            clear_composer(ctx).await;
            pause(ctx.timings.after_clear).await;

            transitions.push(ChainState::Attempting(index));
            debug!(strategy = %strategy_id, method = %method, "Executing strategy");

            let (handled, error) = match strategy.attempt(ctx, text).await {
                Ok(handled) => (handled, None),
                Err(error) => {
                    warn!(strategy = %strategy_id, error = %error, "Strategy failed");
                    (false, Some(error.to_string()))
                }
            };

            let verified = if handled {
                transitions.push(ChainState::Verifying(index));
                verify_insertion(&ctx.element, text, ctx.timings.before_verify).await
            } else {
                None
            };

            let duration = attempt_start.elapsed();
            attempts.push(InsertionAttempt {
                strategy_id: strategy_id.to_string(),
                method,
                handled,
                verified,
                error,
                duration,
            });

            if let Some(verified_via) = verified {
                info!(
                    strategy = %strategy_id,
                    via = %verified_via,
                    duration = ?duration,
                    "Insertion verified"
                );
                announce(ctx, text).await;
                transitions.push(ChainState::Succeeded(index));
                let success = InsertionSuccess {
                    strategy_id: strategy_id.to_string(),
                    method,
                    verified_via,
                };
                return finish(Ok(success), attempts, transitions);
            }

            debug!(strategy = %strategy_id, handled, "Insertion not verified, trying next");
            pause(ctx.timings.between_methods).await;
        }

        warn!(attempts = attempts.len(), "All insertion methods exhausted");
        transitions.push(ChainState::Exhausted);
        let count = attempts.len();
        finish(
            Err(ComposerError::AllMethodsExhausted { attempts: count }),
            attempts,
            transitions,
        )
    }
}

impl Default for InsertionChain {
    fn default() -> Self {
        Self::standard()
    }
}

/// Brings the composer into view and gives it focus.
async fn prepare(ctx: &InsertionContext) -> Result<(), crate::error::PortError> {
    let element = &ctx.element;
    element.scroll_into_view().await?;
    pause(ctx.timings.after_scroll).await;
    element.focus().await?;
    element.click().await?;
    pause(ctx.timings.after_click).await;
    Ok(())
}

/// Dispatches the recognition volley. Failures are logged only.
async fn announce(ctx: &InsertionContext, text: &str) {
    let element = &ctx.element;
    for event in recognition_volley(text) {
        if let Err(error) = element.dispatch(&event).await {
            debug!(event = %event.kind, error = %error, "Volley event failed");
        }
        pause(ctx.timings.volley_gap).await;
    }

    let tail = async {
        element.focus().await?;
        pause(ctx.timings.volley_settle).await;
        element.dispatch(&SyntheticEvent::insert_text(text)).await?;
        element.focus().await
    };
    if let Err(error) = tail.await {
        debug!(error = %error, "Volley tail failed");
    }
}
