//! Provider registry — static specs for every supported provider.
//!
//! Each `ProviderSpec` describes one provider: its CLI name, chat aliases,
//! the status-line label and which config settings it needs.

use std::fmt;

use tracing::{debug, info};

use querybot_core::{Config, Result};

use crate::bing::BingSearch;
use crate::github::GithubStars;
use crate::google::GoogleSearch;
use crate::traits::QueryProvider;
use crate::weather::WeatherForecast;
use crate::wolfram::Wolfram;
use crate::youtube::YouTube;

/// Every provider the bot can query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Bing,
    Google,
    Weather,
    Wolfram,
    GithubStars,
    YouTube,
}

impl ProviderKind {
    pub fn spec(self) -> &'static ProviderSpec {
        find_by_kind(self)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().name)
    }
}

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one provider
// ─────────────────────────────────────────────

/// Static specification describing one provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    pub kind: ProviderKind,
    /// CLI name (e.g. `"wolfram"`).
    pub name: &'static str,
    /// Label used in status lines and logs.
    pub label: &'static str,
    /// Chat command aliases, with the leading `!`.
    pub aliases: &'static [&'static str],
    /// Config settings the provider needs before it makes any request.
    pub settings: &'static [&'static str],
    pub description: &'static str,
}

/// Complete list of supported providers.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        kind: ProviderKind::Bing,
        name: "bing",
        label: "Bing",
        aliases: &["!bing", "!b"],
        settings: &["providers.bing.apiKey"],
        description: "Bing web search, first page or video result",
    },
    ProviderSpec {
        kind: ProviderKind::Google,
        name: "google",
        label: "Google",
        aliases: &["!google", "!g"],
        settings: &["providers.google.apiKey", "providers.google.cxId"],
        description: "Google Custom Search, first result",
    },
    ProviderSpec {
        kind: ProviderKind::Weather,
        name: "weather",
        label: "Weather",
        aliases: &["!weather", "!w"],
        // Only needed for places outside the built-in table.
        settings: &["providers.geonames.username"],
        description: "Current YR forecast for a place",
    },
    ProviderSpec {
        kind: ProviderKind::Wolfram,
        name: "wolfram",
        label: "Wolfram",
        aliases: &["!wolfram", "!wa"],
        settings: &["providers.wolfram.appId"],
        description: "Wolfram|Alpha interpretation and answer",
    },
    ProviderSpec {
        kind: ProviderKind::GithubStars,
        name: "stars",
        label: "GitHub",
        aliases: &["!stars", "!gh"],
        settings: &["providers.github.token"],
        description: "GitHub stars for owner/repo or all of an owner's repositories",
    },
    ProviderSpec {
        kind: ProviderKind::YouTube,
        name: "youtube",
        label: "YouTube",
        aliases: &[],
        settings: &["providers.youtube.apiKey"],
        description: "Title and duration of the first video link in a message",
    },
];

// ─────────────────────────────────────────────
// Lookup functions
// ─────────────────────────────────────────────

/// Find a provider by CLI name or chat alias (case-insensitive).
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    let name = name.trim().to_lowercase();
    PROVIDERS
        .iter()
        .find(|spec| spec.name == name || spec.aliases.contains(&name.as_str()))
}

/// Find a provider by chat alias only (`!w`, `!stars`, …).
pub fn find_by_alias(alias: &str) -> Option<&'static ProviderSpec> {
    let alias = alias.to_lowercase();
    PROVIDERS
        .iter()
        .find(|spec| spec.aliases.contains(&alias.as_str()))
}

pub fn find_by_kind(kind: ProviderKind) -> &'static ProviderSpec {
    PROVIDERS
        .iter()
        .find(|spec| spec.kind == kind)
        .unwrap_or(&PROVIDERS[0])
}

/// Whether the settings a provider needs up front are present.
///
/// Weather is always usable; GeoNames is only consulted for places outside
/// the built-in table.
pub fn is_configured(kind: ProviderKind, config: &Config) -> bool {
    let providers = &config.providers;
    match kind {
        ProviderKind::Bing => providers.bing.is_configured(),
        ProviderKind::Google => providers.google.is_configured(),
        ProviderKind::Weather => true,
        ProviderKind::Wolfram => providers.wolfram.is_configured(),
        ProviderKind::GithubStars => providers.github.is_configured(),
        ProviderKind::YouTube => providers.youtube.is_configured(),
    }
}

// ─────────────────────────────────────────────
// Builder + entry point
// ─────────────────────────────────────────────

/// Build the client for `kind`, failing fast on missing credentials.
pub fn create_provider(kind: ProviderKind, config: &Config) -> Result<Box<dyn QueryProvider>> {
    let providers = &config.providers;
    let http = &config.http;

    let provider: Box<dyn QueryProvider> = match kind {
        ProviderKind::Bing => Box::new(BingSearch::new(&providers.bing, http)?),
        ProviderKind::Google => Box::new(GoogleSearch::new(&providers.google, http)?),
        ProviderKind::Weather => Box::new(WeatherForecast::new(
            &providers.weather,
            &providers.geonames,
            http,
        )),
        ProviderKind::Wolfram => Box::new(Wolfram::new(&providers.wolfram, http)?),
        ProviderKind::GithubStars => Box::new(GithubStars::new(&providers.github, http)?),
        ProviderKind::YouTube => Box::new(YouTube::new(&providers.youtube, http)?),
    };

    debug!(provider = %kind, "created provider");
    Ok(provider)
}

/// Query one provider and render the result as a status line.
///
/// An empty string means there is nothing to say.
pub async fn query(kind: ProviderKind, input: &str, config: &Config) -> Result<String> {
    let provider = create_provider(kind, config)?;
    let output = provider.query(input).await?;
    info!(provider = %kind, silent = output.is_empty(), "query complete");
    Ok(output)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
