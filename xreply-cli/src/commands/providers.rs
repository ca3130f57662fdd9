//! Providers command - list supported providers.

use anyhow::Result;
use tracing::info;
use xreply_providers::ProviderRegistry;

use crate::output::{JsonFormatter, ProviderInfoOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the providers command.
pub async fn run(cli: &Cli) -> Result<()> {
    info!("Listing providers");

    let settings = cli.open_store().await?.get().await;
    let providers = ProviderRegistry::all();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!(" {}", formatter.format_providers_header());
            println!("{}", "─".repeat(72));
            for desc in providers {
                let active = desc.id == settings.provider;
                println!("{}", formatter.format_provider_line(desc, &settings, active));
            }

            println!();
            println!(
                "Total: {} providers ({} configured, * = active)",
                providers.len(),
                providers
                    .iter()
                    .filter(|d| !settings.api_key_for(d.id).trim().is_empty())
                    .count()
            );
        }
        OutputFormat::Json => {
            let output: Vec<ProviderInfoOutput> = providers
                .iter()
                .map(|desc| ProviderInfoOutput {
                    id: desc.cli_name().to_string(),
                    display_name: desc.display_name().to_string(),
                    host: desc.host.to_string(),
                    key_field: desc.storage.api_key.to_string(),
                    model: settings
                        .model_for(desc.id)
                        .unwrap_or_else(|| desc.default_model.to_string()),
                    configured: !settings.api_key_for(desc.id).trim().is_empty(),
                    active: desc.id == settings.provider,
                })
                .collect();
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&output)?);
        }
    }

    Ok(())
}
