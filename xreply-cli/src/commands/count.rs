//! Count command - weighted character count and tweet heuristics.

use anyhow::Result;
use clap::Args;
use xreply_core::{
    TWEET_CHAR_LIMIT, detect_language, detect_tweet_type, enforce_char_limit, extract_hashtags,
    extract_mentions, twitter_char_count,
};

use crate::output::{CountOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the count command.
#[derive(Args, Debug)]
pub struct CountArgs {
    /// Text to count.
    pub text: String,

    /// Also show the text trimmed to the limit.
    #[arg(long)]
    pub trim: bool,
}

/// Builds the count report for `text`.
pub fn report(text: &str, trim: bool) -> CountOutput {
    let chars = twitter_char_count(text);
    let within_limit = chars <= TWEET_CHAR_LIMIT;
    let remaining = i64::try_from(TWEET_CHAR_LIMIT).unwrap_or(i64::MAX)
        - i64::try_from(chars).unwrap_or(i64::MAX);

    CountOutput {
        chars,
        limit: TWEET_CHAR_LIMIT,
        remaining,
        within_limit,
        language: detect_language(text).to_string(),
        tweet_type: detect_tweet_type(text).as_str().to_string(),
        mentions: extract_mentions(text),
        hashtags: extract_hashtags(text),
        trimmed: (trim && !within_limit).then(|| enforce_char_limit(text)),
    }
}

/// Runs the count command.
pub fn run(args: &CountArgs, cli: &Cli) -> Result<()> {
    let report = report(&args.text, args.trim);

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_count(&report));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&report)?);
        }
    }

    Ok(())
}
