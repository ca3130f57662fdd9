//! Config command - manage settings.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::Value;
use tracing::info;
use xreply_store::{Settings, default_config_dir};

use crate::output::{JsonFormatter, TextFormatter, mask_key};
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current settings (keys masked).
    Show,

    /// Show settings paths.
    Path,

    /// Write default settings, replacing the stored record.
    Init,

    /// Merge defaults under the stored record, keeping stored values.
    Upgrade,

    /// Set one settings key, e.g. `provider claude` or `maxWords 24`.
    Set {
        /// Settings key as stored (camelCase).
        key: String,
        /// New value. Text keys take it verbatim, others parse it as JSON.
        value: String,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Init => init_config(cli).await,
        ConfigAction::Upgrade => upgrade_config(cli).await,
        ConfigAction::Set { key, value } => set_value(key, value, cli).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let settings = cli.open_store().await?.get().await;
    print_settings(&settings, cli)
}

fn print_settings(settings: &Settings, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_settings(settings));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_settings(settings)?);
        }
    }
    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = cli.settings_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "configDir": config_dir.display().to_string(),
                "settingsFile": settings_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn init_config(cli: &Cli) -> Result<()> {
    let store = cli.open_store().await?;
    let settings = store.install().await?;
    info!(path = %store.path().display(), "Settings initialized");
    if !cli.quiet {
        println!("Wrote default settings to {}", store.path().display());
    }
    if cli.format == OutputFormat::Json {
        print_settings(&settings, cli)?;
    }
    Ok(())
}

async fn upgrade_config(cli: &Cli) -> Result<()> {
    let store = cli.open_store().await?;
    let settings = store.upgrade().await?;
    info!(path = %store.path().display(), "Settings upgraded");
    print_settings(&settings, cli)
}

async fn set_value(key: &str, raw: &str, cli: &Cli) -> Result<()> {
    let value = parse_value(key, raw)?;
    let store = cli.open_store().await?;
    let settings = store.set_value(key, value).await?;

    let shown = if key.ends_with("Key") {
        mask_key(raw)
    } else {
        raw.to_string()
    };
    info!(key, "Settings value updated");
    if !cli.quiet {
        println!("{key} = {shown}");
    }
    if cli.format == OutputFormat::Json {
        print_settings(&settings, cli)?;
    }
    Ok(())
}

/// Converts a command-line value to the JSON shape the key stores.
///
/// Keys whose default is text take the value verbatim, so an all-digit API
/// key stays a string. Other keys parse it as JSON, falling back to text so
/// the store can reject it with a precise message.
pub fn parse_value(key: &str, raw: &str) -> Result<Value> {
    let defaults = serde_json::to_value(Settings::default())?;
    Ok(match defaults.get(key) {
        Some(Value::String(_)) | None => Value::String(raw.to_string()),
        Some(_) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
    })
}
