//! Simulate command - replay composer insertion against a simulated editor.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::{debug, info};
use xreply_composer::{
    ComposerLocator, DEFAULT_POLL, DEFAULT_WAIT, InsertionChain, InsertionContext,
    InsertionMethod, InsertionTimings, MemoryClipboard, ReflectPolicy, ReplyPage,
    write_clipboard_with_retries,
};
use xreply_core::ReplyError;

use crate::output::{AttemptOutput, JsonFormatter, SimulationOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// What the simulated editor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Accept {
    /// Every insertion method.
    #[default]
    All,
    /// Paste events only.
    Paste,
    /// A bulk input event only.
    InputEvent,
    /// Direct DOM writes only.
    Direct,
    /// Per-character typing only.
    Typing,
    /// Nothing; every method is reverted.
    Never,
}

impl Accept {
    fn policy(self) -> ReflectPolicy {
        match self {
            Self::All => ReflectPolicy::all(),
            Self::Paste => ReflectPolicy::only(InsertionMethod::Clipboard),
            Self::InputEvent => ReflectPolicy::only(InsertionMethod::InputEvent),
            Self::Direct => ReflectPolicy::only(InsertionMethod::Direct),
            Self::Typing => ReflectPolicy::only(InsertionMethod::Typing),
            Self::Never => ReflectPolicy::never(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Paste => "paste",
            Self::InputEvent => "input-event",
            Self::Direct => "direct",
            Self::Typing => "typing",
            Self::Never => "never",
        }
    }
}

/// Arguments for the simulate command.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Text to insert.
    pub text: String,

    /// Insertion methods the editor reflects.
    #[arg(long, value_enum, default_value_t = Accept::All)]
    pub accept: Accept,

    /// Run without clipboard access.
    #[arg(long)]
    pub no_clipboard: bool,

    /// Editor stays in placeholder mode until cleared.
    #[arg(long)]
    pub sticky_placeholder: bool,

    /// Page has no composer.
    #[arg(long)]
    pub no_composer: bool,

    /// Use production pauses and the configured typing speed.
    #[arg(long)]
    pub realtime: bool,
}

/// Runs the simulate command.
pub async fn run(args: &SimulateArgs, cli: &Cli) -> Result<()> {
    let timings = if args.realtime {
        let settings = cli.open_store().await?.get().await;
        InsertionTimings::default().with_typing_delay(settings.typing_speed.delay())
    } else {
        InsertionTimings::immediate()
    };

    let report = simulate(args, timings).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_simulation(&report));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&report)?);
        }
    }

    match &report.error {
        Some(_) if report.clipboard.is_empty() => Err(ReplyError::InsertionFailed {
            attempts: report.attempts.len(),
        }
        .into()),
        _ => Ok(()),
    }
}

/// Builds a reply page, locates its composer and runs the insertion chain.
///
/// When every method fails and a clipboard is available, the text is left
/// on the clipboard the way the topic flow does.
///
/// # Errors
///
/// Returns [`ReplyError::ComposerNotFound`] when the page has no composer.
pub async fn simulate(
    args: &SimulateArgs,
    timings: InsertionTimings,
) -> Result<SimulationOutput, ReplyError> {
    let mut page = ReplyPage::new("Simulated tweet").with_policy(args.accept.policy());
    if args.sticky_placeholder {
        page = page.with_sticky_placeholder();
    }
    if args.no_composer {
        page = page.without_composer();
    }
    let doc = page.build();
    let clipboard = Arc::new(MemoryClipboard::new());

    let wait = if args.realtime {
        DEFAULT_WAIT
    } else {
        Duration::ZERO
    };
    let located = ComposerLocator::new()
        .wait_for(doc.as_ref(), wait, DEFAULT_POLL)
        .await?;
    debug!(source = ?located.source, "Composer located");

    let clipboard_retry = timings.clipboard_retry;
    let mut ctx =
        InsertionContext::new(doc.clone(), located.element.clone()).with_timings(timings);
    if !args.no_clipboard {
        ctx = ctx.with_clipboard(clipboard.clone());
    }

    let outcome = InsertionChain::standard().insert(&ctx, &args.text).await;
    let error = outcome.result.as_ref().err().map(ToString::to_string);
    if outcome.result.is_err() && !args.no_clipboard {
        if let Err(e) =
            write_clipboard_with_retries(clipboard.as_ref(), &args.text, clipboard_retry).await
        {
            debug!(error = %e, "Clipboard fallback failed");
        }
    }
    info!(
        accept = args.accept.label(),
        success = outcome.is_success(),
        attempts = outcome.attempts_count(),
        "Simulation finished"
    );

    Ok(SimulationOutput {
        accept: args.accept.label().to_string(),
        success: outcome.is_success(),
        method: outcome.successful_method().map(|m| m.id().to_string()),
        attempts: outcome.attempts.iter().map(AttemptOutput::from).collect(),
        composer_text: located.element.text_content().await.unwrap_or_default(),
        clipboard: clipboard.contents(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str, accept: Accept) -> SimulateArgs {
        SimulateArgs {
            text: text.to_string(),
            accept,
            no_clipboard: false,
            sticky_placeholder: false,
            no_composer: false,
            realtime: false,
        }
    }

    #[tokio::test]
    async fn test_permissive_editor_takes_paste() {
        let report = simulate(&args("Hello there", Accept::All), InsertionTimings::immediate())
            .await
            .unwrap();
        assert!(report.success);
        assert_eq!(report.method.as_deref(), Some("clipboard"));
        assert_eq!(report.attempts.len(), 1);
        assert_eq!(report.composer_text, "Hello there");
    }

    #[tokio::test]
    async fn test_typing_editor_runs_whole_chain() {
        let report = simulate(&args("Hi", Accept::Typing), InsertionTimings::immediate())
            .await
            .unwrap();
        assert_eq!(report.method.as_deref(), Some("typing"));
        assert_eq!(report.attempts.len(), 4);
        assert_eq!(report.composer_text, "Hi");
    }

    #[tokio::test]
    async fn test_rejecting_editor_leaves_text_on_clipboard() {
        let report = simulate(&args("Hi", Accept::Never), InsertionTimings::immediate())
            .await
            .unwrap();
        assert!(!report.success);
        assert!(report.error.is_some());
        assert_eq!(report.clipboard, "Hi");
    }

    #[tokio::test]
    async fn test_missing_composer() {
        let mut args = args("Hi", Accept::All);
        args.no_composer = true;
        let err = simulate(&args, InsertionTimings::immediate())
            .await
            .unwrap_err();
        assert_eq!(err, ReplyError::ComposerNotFound);
    }
}
