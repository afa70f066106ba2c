//! Config loader — reads `~/.querybot/config.json`, merges env vars, and
//! applies legacy migrations.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.querybot/config.json`
//! 3. Environment variables `QUERYBOT_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Flat keys from the older single-level config, and where they live now.
const LEGACY_KEYS: &[(&str, &str, &str)] = &[
    ("bing_api_key", "bing", "apiKey"),
    ("geonames_id", "geonames", "username"),
    ("github_api_key", "github", "token"),
    ("google_search_api_key", "google", "apiKey"),
    ("google_search_cx_id", "google", "cxId"),
    ("google_youtube_key", "youtube", "apiKey"),
    ("wolfram_id", "wolfram", "appId"),
];

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let mut raw: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    migrate_config(&mut raw);

    let config: Config = match serde_json::from_value(raw) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to deserialize config: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Move flat legacy keys (`bing_api_key`, `wolfram_id`, …) into `providers.*`.
///
/// A value already present under `providers` wins over the legacy key.
fn migrate_config(raw: &mut serde_json::Value) {
    let Some(root) = raw.as_object_mut() else {
        return;
    };

    for (legacy, section, field) in LEGACY_KEYS {
        let Some(value) = root.remove(*legacy) else {
            continue;
        };

        let providers = root
            .entry("providers")
            .or_insert_with(|| serde_json::json!({}));
        let Some(providers) = providers.as_object_mut() else {
            continue;
        };
        let entry = providers
            .entry(*section)
            .or_insert_with(|| serde_json::json!({}));
        if let Some(entry) = entry.as_object_mut() {
            if !entry.contains_key(*field) {
                entry.insert((*field).to_string(), value);
                debug!("Migrated {} → providers.{}.{}", legacy, section, field);
            }
        }
    }
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `QUERYBOT_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `QUERYBOT_PROVIDERS__BING__API_KEY`
/// - `QUERYBOT_PROVIDERS__GOOGLE__API_KEY`, `QUERYBOT_PROVIDERS__GOOGLE__CX_ID`
/// - `QUERYBOT_PROVIDERS__GEONAMES__USERNAME`
/// - `QUERYBOT_PROVIDERS__WOLFRAM__APP_ID`
/// - `QUERYBOT_PROVIDERS__GITHUB__TOKEN`
/// - `QUERYBOT_PROVIDERS__YOUTUBE__API_KEY`
/// - `QUERYBOT_PROVIDERS__<NAME>__API_BASE` for every provider
/// - `QUERYBOT_HTTP__TIMEOUT_SECS`
fn apply_env_overrides(mut config: Config) -> Config {
    let p = &mut config.providers;

    override_string(&mut p.bing.api_key, "QUERYBOT_PROVIDERS__BING__API_KEY");
    override_string(&mut p.google.api_key, "QUERYBOT_PROVIDERS__GOOGLE__API_KEY");
    override_string(&mut p.google.cx_id, "QUERYBOT_PROVIDERS__GOOGLE__CX_ID");
    override_string(&mut p.geonames.username, "QUERYBOT_PROVIDERS__GEONAMES__USERNAME");
    override_string(&mut p.wolfram.app_id, "QUERYBOT_PROVIDERS__WOLFRAM__APP_ID");
    override_string(&mut p.github.token, "QUERYBOT_PROVIDERS__GITHUB__TOKEN");
    override_string(&mut p.youtube.api_key, "QUERYBOT_PROVIDERS__YOUTUBE__API_KEY");

    override_base(&mut p.bing.api_base, "BING");
    override_base(&mut p.google.api_base, "GOOGLE");
    override_base(&mut p.geonames.api_base, "GEONAMES");
    override_base(&mut p.weather.api_base, "WEATHER");
    override_base(&mut p.wolfram.api_base, "WOLFRAM");
    override_base(&mut p.github.api_base, "GITHUB");
    override_base(&mut p.youtube.api_base, "YOUTUBE");

    if let Ok(val) = std::env::var("QUERYBOT_HTTP__TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.http.timeout_secs = n;
        }
    }

    config
}

fn override_string(target: &mut String, var: &str) {
    if let Ok(val) = std::env::var(var) {
        *target = val;
    }
}

fn override_base(target: &mut Option<String>, name: &str) {
    if let Ok(val) = std::env::var(format!("QUERYBOT_PROVIDERS__{name}__API_BASE")) {
        *target = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
