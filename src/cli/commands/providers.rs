//! Provider listing command handler.

use anyhow::Result;

use crate::config::{ConfigFile, ConfigManager};
use crate::ui::Style;

/// Prints configured providers to stdout.
///
/// If `specific_provider` is provided, shows detailed information for that provider.
/// Otherwise, lists all configured providers with their endpoints and models.
pub fn print_providers(specific_provider: Option<&str>) -> Result<()> {
    let config = ConfigManager::new()?.load_or_default()?;
    render_providers(&config, specific_provider)
}

fn render_providers(config: &ConfigFile, specific_provider: Option<&str>) -> Result<()> {
    if config.providers.is_empty() {
        println!("No providers configured.");
        println!("Add providers to ~/.config/mdtl/config.toml");
        return Ok(());
    }

    let default_provider = config.mdtl.provider.as_deref();
    let marker = |name: &str| {
        if default_provider == Some(name) {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        }
    };

    if let Some(provider_name) = specific_provider {
        let Some(provider) = config.providers.get(provider_name) else {
            anyhow::bail!("Provider '{provider_name}' not found");
        };

        println!(
            "{} {}{}",
            Style::header("Provider:"),
            Style::value(provider_name),
            marker(provider_name)
        );
        println!("  {} = {}", Style::label("endpoint"), provider.endpoint);
        if provider.requires_api_key() {
            let has_key = provider.get_api_key().is_some();
            println!(
                "  {}  = {}",
                Style::label("api_key"),
                if has_key { "(set)" } else { "(not set)" }
            );
        }
        if provider.models.is_empty() {
            println!("  {}   = (none configured)", Style::label("models"));
        } else {
            println!("  {}:", Style::label("models"));
            for model in &provider.models {
                println!("    - {model}");
            }
        }
    } else {
        println!("{}\n", Style::header("Configured providers:"));
        let mut names: Vec<_> = config.providers.keys().collect();
        names.sort();
        for name in names {
            let provider = &config.providers[name];
            println!("  {}{}", Style::value(name), marker(name));
            println!(
                "    {} {}",
                Style::label("endpoint:"),
                Style::secondary(&provider.endpoint)
            );
            if !provider.models.is_empty() {
                println!(
                    "    {} {}",
                    Style::label("models:"),
                    provider.models.join(", ")
                );
            }
        }
    }

    Ok(())
}
