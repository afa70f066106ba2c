//! Bing Web Search — first web page, else first video.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use querybot_core::config::schema::{ApiKeyConfig, HttpConfig};
use querybot_core::format::{no_results, query_error, query_returned, BOLD};
use querybot_core::{QueryError, Result};

use crate::http::{api_base, build_client, decode_json, endpoint, send, Fetched};
use crate::normalize::ProviderPayload;
use crate::registry::ProviderKind;
use crate::response::ProviderResponse;
use crate::traits::QueryProvider;

const LABEL: &str = "Bing";
const DEFAULT_API_BASE: &str = "https://api.bing.microsoft.com";

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

/// The subset of a Bing search answer we render.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BingAnswer {
    pub web_pages: WebPages,
    pub videos: Videos,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebPages {
    pub total_estimated_matches: u64,
    pub value: Vec<WebPage>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebPage {
    pub name: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Videos {
    pub value: Vec<Video>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Video {
    pub name: String,
    pub description: String,
    pub content_url: String,
    /// ISO-8601, e.g. `PT2M51S`.
    pub duration: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BingErrorBody {
    errors: Vec<BingErrorItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BingErrorItem {
    code: String,
    message: String,
}

// ─────────────────────────────────────────────
// Selection + formatting
// ─────────────────────────────────────────────

/// The single result a Bing answer is rendered from.
#[derive(Debug, PartialEq)]
pub enum BingCandidate<'a> {
    Page { total: u64, page: &'a WebPage },
    Video(&'a Video),
}

/// Page results take precedence over video results.
pub fn select(answer: &BingAnswer) -> Option<BingCandidate<'_>> {
    if let Some(page) = answer.web_pages.value.first() {
        return Some(BingCandidate::Page {
            total: answer.web_pages.total_estimated_matches,
            page,
        });
    }
    answer.videos.value.first().map(BingCandidate::Video)
}

/// `PT2M51S` → `2m51s`.
fn compact_duration(duration: &str) -> String {
    duration
        .strip_prefix("PT")
        .unwrap_or(duration)
        .to_lowercase()
}

/// Render a Bing outcome as one status line.
pub fn normalize(response: &ProviderResponse<BingAnswer>) -> String {
    match response {
        ProviderResponse::Success(answer) => match select(answer) {
            Some(BingCandidate::Page { total, page }) => format!(
                "{BOLD}{LABEL} ({BOLD}{total} results{BOLD}):{BOLD} {} - {}",
                page.url, page.snippet
            ),
            Some(BingCandidate::Video(video)) => format!(
                "{BOLD}{LABEL} ({BOLD}{}{BOLD}):{BOLD} {} - {} - {}",
                compact_duration(&video.duration),
                video.content_url,
                video.name,
                video.description
            ),
            None => no_results(LABEL),
        },
        ProviderResponse::Empty => no_results(LABEL),
        ProviderResponse::ProviderError { message, .. } => query_error(LABEL, message),
        ProviderResponse::HttpStatus(status) => query_returned(LABEL, *status),
    }
}

/// Classify a raw HTTP exchange. Only undecodable bodies are errors.
pub(crate) fn classify(fetched: &Fetched) -> Result<ProviderResponse<BingAnswer>> {
    if fetched.is_success() {
        let answer: BingAnswer = decode_json(LABEL, &fetched.body)?;
        return Ok(ProviderResponse::from_payload(answer, |a| select(a).is_some()));
    }

    if fetched.body.trim().is_empty() {
        return Ok(ProviderResponse::HttpStatus(fetched.status));
    }

    let body: BingErrorBody = decode_json(LABEL, &fetched.body)?;
    Ok(match body.errors.into_iter().next() {
        Some(first) => ProviderResponse::ProviderError {
            code: first.code,
            message: first.message,
        },
        None => ProviderResponse::HttpStatus(fetched.status),
    })
}

// ─────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────

/// Bing Web Search v7 client.
pub struct BingSearch {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl BingSearch {
    /// Fails fast when no API key is configured.
    pub fn new(config: &ApiKeyConfig, http: &HttpConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(QueryError::Config {
                provider: LABEL,
                setting: "providers.bing.apiKey",
            });
        }
        Ok(Self {
            client: build_client(http),
            api_base: api_base(config.api_base.as_deref(), DEFAULT_API_BASE),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl QueryProvider for BingSearch {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Bing
    }

    async fn fetch(&self, input: &str) -> Result<Option<ProviderPayload>> {
        let url = endpoint(&self.api_base, &["v7.0", "search"])?;
        debug!(query = %input, "searching bing");

        let request = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .query(&[
                ("answerCount", "1"),
                ("count", "1"),
                ("safeSearch", "Moderate"),
                ("q", input),
            ]);

        let fetched = send(LABEL, request).await?;
        Ok(Some(ProviderPayload::Bing(classify(&fetched)?)))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
