//! `querybot status` — show configuration and provider status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use querybot_core::Config;
use querybot_providers::registry::{is_configured, ProviderKind, PROVIDERS};

/// Run the status command.
pub fn run(config: &Config, config_path: &Path) -> Result<()> {
    println!();
    println!("{}", "🔎 Querybot Status".cyan().bold());
    println!();

    let config_exists = config_path.exists();
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_exists {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );
    println!(
        "  {:<18} {}",
        "HTTP timeout:".bold(),
        format!("{}s", config.http.timeout_secs).dimmed()
    );

    println!();
    println!("  {}", "Providers:".bold());
    for spec in PROVIDERS {
        println!(
            "    {:<10} {:<20} {}",
            spec.name,
            spec.aliases.join(" ").dimmed(),
            provider_status(spec.kind, config)
        );
    }
    println!();

    Ok(())
}

fn provider_status(kind: ProviderKind, config: &Config) -> String {
    if kind == ProviderKind::Weather && !config.providers.geonames.is_configured() {
        return format!("{} (built-in places only)", "✓".yellow());
    }
    if is_configured(kind, config) {
        format!("{} (configured)", "✓".green())
    } else {
        let missing = kind.spec().settings.join(", ");
        format!("{} {missing}", "· missing".dimmed())
    }
}
