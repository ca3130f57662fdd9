// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! xreply CLI - reply generation and composer simulation from the terminal.
//!
//! # Examples
//!
//! ```bash
//! # Reply to a tweet with the configured provider
//! xreply reply "Is Rust worth learning in 2025?" --author ada
//!
//! # Draft a tweet about a topic
//! xreply tweet "shipping on fridays" --tone humorous
//!
//! # Weighted character count
//! xreply count "Read this https://example.com/a/very/long/path"
//!
//! # Manage settings
//! xreply config set provider claude
//! xreply config set claudeKey sk-ant-...
//!
//! # Try the insertion chain against an editor that only accepts typing
//! xreply simulate "Hello there" --accept typing
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use xreply_core::{ErrorKind, ReplyError};
use xreply_store::{SettingsStore, default_settings_path};

use commands::{config, count, generate, providers, simulate};

// ============================================================================
// CLI Definition
// ============================================================================

/// xreply CLI - AI replies for X from the command line.
#[derive(Parser)]
#[command(name = "xreply")]
#[command(about = "AI reply assistant CLI")]
#[command(long_about = r#"
xreply generates replies and tweets through a configured LLM provider,
post-processes them the way the browser extension does, and can replay
composer insertion against a simulated editor.

Supported providers:
  • Google Gemini (gemini)
  • OpenRouter (openrouter)
  • OpenAI (openai)
  • DeepSeek (deepseek)
  • Anthropic Claude (claude)

Examples:
  xreply reply "Hot take: tabs > spaces"   # Generate a reply
  xreply tweet "rust 2024 edition"         # Generate a tweet
  xreply providers                         # List providers
  xreply config show --format json         # Settings as JSON
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Settings file (defaults to the per-user config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Resolved settings file path.
    pub fn settings_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_settings_path)
    }

    /// Opens the settings store at the resolved path.
    pub async fn open_store(&self) -> Result<SettingsStore> {
        Ok(SettingsStore::load(self.settings_path()).await?)
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a reply to a tweet.
    #[command(visible_alias = "r")]
    Reply(generate::ReplyArgs),

    /// Generate a tweet about a topic.
    #[command(visible_alias = "t")]
    Tweet(generate::TweetArgs),

    /// Count characters the way X does.
    Count(count::CountArgs),

    /// List supported providers.
    #[command(visible_alias = "p")]
    Providers,

    /// Manage settings.
    Config(config::ConfigArgs),

    /// Replay composer insertion against a simulated editor.
    Simulate(simulate::SimulateArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Missing or invalid settings, such as an API key.
    Configuration = 2,
    /// The provider failed after retries.
    Provider = 3,
    /// The composer was missing or rejected every insertion method.
    Insertion = 4,
}

impl ExitCode {
    /// Picks the exit code for a failed command.
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<ReplyError>().map(ReplyError::kind) {
            Some(ErrorKind::Configuration) => Self::Configuration,
            Some(ErrorKind::Provider) => Self::Provider,
            Some(ErrorKind::ComposerNotFound | ErrorKind::InsertionFailed) => Self::Insertion,
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("xreply=debug,info")
    } else {
        EnvFilter::new("xreply=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Reply(args) => generate::run_reply(args, &cli).await,
        Commands::Tweet(args) => generate::run_tweet(args, &cli).await,
        Commands::Count(args) => count::run(args, &cli),
        Commands::Providers => providers::run(&cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
        Commands::Simulate(args) => simulate::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}
