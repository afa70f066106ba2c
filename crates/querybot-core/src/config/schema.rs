//! Configuration schema.
//!
//! Hierarchy: `Config` → `ProvidersConfig` (one section per provider),
//! `HttpConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.querybot/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub http: HttpConfig,
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Credentials and endpoints for every provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    pub bing: ApiKeyConfig,
    pub google: GoogleConfig,
    pub geonames: GeonamesConfig,
    pub weather: WeatherConfig,
    pub wolfram: WolframConfig,
    pub github: GithubConfig,
    pub youtube: ApiKeyConfig,
}

/// A provider authenticated by a single API key (Bing, YouTube).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiKeyConfig {
    /// API key sent with each request.
    pub api_key: String,
    /// Custom API base URL (overrides the provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ApiKeyConfig {
    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Google Custom Search needs both a key and a search engine ID.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoogleConfig {
    pub api_key: String,
    /// Programmable search engine ID (`cx`).
    pub cx_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl GoogleConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.cx_id.is_empty()
    }
}

/// GeoNames authenticates with an account username.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeonamesConfig {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl GeonamesConfig {
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty()
    }
}

/// The forecast service is keyless; only the endpoint can be changed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

/// Wolfram|Alpha authenticates with an application ID.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WolframConfig {
    pub app_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl WolframConfig {
    pub fn is_configured(&self) -> bool {
        !self.app_id.is_empty()
    }
}

/// GitHub authenticates with a personal access token.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GithubConfig {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl GithubConfig {
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }
}

// ─────────────────────────────────────────────
// HTTP
// ─────────────────────────────────────────────

/// Settings applied to every outbound request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            user_agent: concat!("querybot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unconfigured() {
        let config = Config::default();
        assert!(!config.providers.bing.is_configured());
        assert!(!config.providers.google.is_configured());
        assert!(!config.providers.geonames.is_configured());
        assert!(!config.providers.wolfram.is_configured());
        assert!(!config.providers.github.is_configured());
        assert!(!config.providers.youtube.is_configured());
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn test_google_needs_both_fields() {
        let mut google = GoogleConfig {
            api_key: "key".into(),
            ..Default::default()
        };
        assert!(!google.is_configured());
        google.cx_id = "cx".into();
        assert!(google.is_configured());
    }

    #[test]
    fn test_camel_case_round_trip() {
        let json = r#"{
            "providers": {
                "google": { "apiKey": "g", "cxId": "cx-1" },
                "wolfram": { "appId": "W-1", "apiBase": "http://localhost:9" }
            },
            "http": { "timeoutSecs": 10 }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.providers.google.cx_id, "cx-1");
        assert_eq!(config.providers.wolfram.app_id, "W-1");
        assert_eq!(
            config.providers.wolfram.api_base.as_deref(),
            Some("http://localhost:9")
        );
        assert_eq!(config.http.timeout_secs, 10);
        // Missing field keeps its default.
        assert!(config.http.user_agent.starts_with("querybot/"));
    }

    #[test]
    fn test_api_base_not_serialized_when_absent() {
        let raw = serde_json::to_value(Config::default()).unwrap();
        assert!(raw["providers"]["bing"].get("apiBase").is_none());
        assert!(raw["providers"]["bing"].get("apiKey").is_some());
    }
}
