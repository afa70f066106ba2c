//! Querybot CLI — entry point.
//!
//! # Commands
//!
//! - `querybot query <PROVIDER> <INPUT>...` — one lookup, one status line
//! - `querybot repl` — feed chat lines (`!w oslo`, video links) interactively
//! - `querybot status` — show which providers are configured
//! - `querybot init` — write a default `~/.querybot/config.json`

mod dispatch;
mod helpers;
mod init;
mod repl;
mod status;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use querybot_core::config::{get_config_path, load_config};
use querybot_core::QueryError;
use querybot_providers::registry::{self, find_by_name, PROVIDERS};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🔎 Querybot — one-line answers from web search, weather, Wolfram|Alpha, GitHub and YouTube
#[derive(Parser)]
#[command(name = "querybot", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.querybot/config.json)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query one provider and print its status line
    Query {
        /// Provider name or chat alias (bing, google, weather, wolfram, stars, youtube, !w, …)
        provider: String,

        /// Search phrase, place, owner[/repo] or message
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,

        /// Print the line with raw bold bytes instead of terminal bold
        #[arg(long, default_value_t = false)]
        raw: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Read chat lines interactively and answer them
    Repl {
        /// Print lines with raw bold bytes instead of terminal bold
        #[arg(long, default_value_t = false)]
        raw: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and provider status
    Status,

    /// Create a default config file
    Init,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .as_deref()
        .map(helpers::expand_tilde)
        .unwrap_or_else(get_config_path);

    match cli.command {
        Commands::Query {
            provider,
            input,
            raw,
            logs,
        } => {
            init_logging(logs);
            run_query(&provider, &input.join(" "), &config_path, raw).await
        }
        Commands::Repl { raw, logs } => {
            init_logging(logs);
            let config = load_config(Some(&config_path));
            repl::run(&config, raw).await
        }
        Commands::Status => {
            let config = load_config(Some(&config_path));
            status::run(&config, &config_path)
        }
        Commands::Init => init::run(&config_path).map(|_| ()),
    }
}

// ─────────────────────────────────────────────
// Query command
// ─────────────────────────────────────────────

async fn run_query(provider: &str, input: &str, config_path: &Path, raw: bool) -> Result<()> {
    let spec = find_by_name(provider).ok_or_else(|| {
        let names: Vec<&str> = PROVIDERS.iter().map(|s| s.name).collect();
        QueryError::InvalidInput(format!(
            "unknown provider '{provider}' (expected one of: {})",
            names.join(", ")
        ))
    })?;

    let config = load_config(Some(config_path));
    info!(provider = spec.name, "running single query");

    let line = registry::query(spec.kind, input, &config)
        .await
        .with_context(|| format!("{} query failed", spec.label))?;

    if !line.is_empty() {
        helpers::print_status_line(&line, raw);
    }
    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("querybot=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
