//! Reply and tweet commands - generate text through the configured provider.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use xreply_bridge::{BackgroundService, TOPIC_WORD_RANGE, topic_prompt};
use xreply_core::{GenerationRequest, GenerationResult, ReplyError, TweetContent};
use xreply_fetch::FetchSettings;
use xreply_store::{SettingsStore, Tone};

use crate::output::{GenerationOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Options shared by the generating commands.
#[derive(Args, Debug, Clone)]
pub struct GenerationArgs {
    /// Seed for the humanization randomness.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Per-attempt request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Send requests to this base URL instead of the provider's host.
    #[arg(long, hide = true)]
    pub base_url: Option<String>,
}

/// Arguments for the reply command.
#[derive(Args, Debug)]
pub struct ReplyArgs {
    /// Text of the tweet to reply to.
    pub text: String,

    /// Display name of the tweet's author.
    #[arg(long, short)]
    pub author: Option<String>,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// Arguments for the tweet command.
#[derive(Args, Debug)]
pub struct TweetArgs {
    /// What the tweet should be about.
    pub topic: String,

    /// Tone to write in (defaults to the configured tone).
    #[arg(long)]
    pub tone: Option<Tone>,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// Runs the reply command.
pub async fn run_reply(args: &ReplyArgs, cli: &Cli) -> Result<()> {
    let mut tweet = TweetContent::from_text(args.text.trim());
    if let Some(author) = &args.author {
        tweet = tweet.with_author(author.clone());
    }
    if tweet.is_empty() {
        return Err(ReplyError::InvalidRequest("Invalid tweet content".to_string()).into());
    }
    info!(language = %tweet.language, tweet_type = %tweet.tweet_type, "Generating reply");

    let store = cli.open_store().await?;
    let result = generate(store, &args.generation, GenerationRequest::Reply(tweet)).await?;
    print_result(&result, cli)
}

/// Runs the tweet command.
pub async fn run_tweet(args: &TweetArgs, cli: &Cli) -> Result<()> {
    if args.topic.trim().is_empty() {
        return Err(ReplyError::InvalidRequest("Please enter a topic".to_string()).into());
    }

    let store = cli.open_store().await?;
    let tone = args.tone.unwrap_or(store.get().await.tone);
    info!(tone = %tone, "Generating tweet");

    let prompt = topic_prompt(&args.topic, tone, TOPIC_WORD_RANGE);
    let result = generate(store, &args.generation, GenerationRequest::Tweet(prompt)).await?;
    print_result(&result, cli)
}

async fn generate(
    store: SettingsStore,
    args: &GenerationArgs,
    request: GenerationRequest,
) -> Result<GenerationResult, ReplyError> {
    let settings = FetchSettings::default().with_timeout(Duration::from_secs(args.timeout));
    let mut service = BackgroundService::new(Arc::new(store)).with_fetch_settings(settings);
    if let Some(base_url) = &args.base_url {
        service = service.with_base_url(base_url.clone());
    }
    if let Some(seed) = args.seed {
        service = service.with_rng(StdRng::seed_from_u64(seed));
    }
    service.generate(&request).await
}

fn print_result(result: &GenerationResult, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text if cli.quiet => println!("{}", result.text),
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_generation(result));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&GenerationOutput::from(result))?);
        }
    }
    Ok(())
}
