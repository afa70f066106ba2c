//! YouTube — title and duration for the first video link in a chat line.
//!
//! Lines without a recognizable link are ignored: [`YouTube::fetch`] returns
//! `Ok(None)` and no request is made.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use querybot_core::config::schema::{ApiKeyConfig, HttpConfig};
use querybot_core::format::{humanize_iso8601, query_error, query_returned, BOLD};
use querybot_core::{QueryError, Result};

use crate::http::{api_base, build_client, decode_json, endpoint, send, Fetched};
use crate::normalize::ProviderPayload;
use crate::registry::ProviderKind;
use crate::response::ProviderResponse;
use crate::traits::QueryProvider;

const LABEL: &str = "YouTube";
const DEFAULT_API_BASE: &str = "https://www.googleapis.com";
const MAX_ID_LEN: usize = 64;

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(www\.)?(youtube\.com|youtu\.be)/\S+").expect("valid link pattern")
});

// ─────────────────────────────────────────────
// Link detection
// ─────────────────────────────────────────────

/// First video-host link in `msg`, if any.
pub fn find_link(msg: &str) -> Option<&str> {
    LINK_RE.find(msg).map(|m| m.as_str())
}

fn is_valid_id(id: &str) -> bool {
    (1..=MAX_ID_LEN).contains(&id.len())
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Video identifier from the first link in `msg`.
///
/// Understands `youtu.be/<id>`, `youtube.com/watch?v=<id>` and the
/// `/embed/`, `/shorts/`, `/v/` path forms.
pub fn extract_video_id(msg: &str) -> Option<String> {
    let url = Url::parse(find_link(msg)?).ok()?;
    let host = url.host_str()?.trim_start_matches("www.");
    let mut segments = url.path_segments()?;

    let id = match host {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" => match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some("embed" | "shorts" | "v") => segments.next().map(str::to_string),
            _ => None,
        },
        _ => None,
    }?;

    is_valid_id(&id).then_some(id)
}

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

/// `videos.list` response.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoList {
    pub items: Vec<VideoItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
    pub content_details: ContentDetails,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VideoSnippet {
    pub title: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContentDetails {
    /// ISO-8601, e.g. `PT37M51S`.
    pub duration: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiErrorBody {
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiError {
    code: u16,
    message: String,
}

// ─────────────────────────────────────────────
// Formatting
// ─────────────────────────────────────────────

/// Render video metadata as one status line.
///
/// Unknown videos render as an empty string, same as a line with no link.
pub fn normalize(response: &ProviderResponse<VideoList>) -> String {
    match response {
        ProviderResponse::Success(list) => match list.items.first() {
            Some(item) => match humanize_iso8601(&item.content_details.duration) {
                Some(duration) => format!(
                    "{BOLD}{LABEL} ({BOLD}{duration}{BOLD}):{BOLD} {}",
                    item.snippet.title
                ),
                None => format!("{BOLD}{LABEL}:{BOLD} {}", item.snippet.title),
            },
            None => String::new(),
        },
        ProviderResponse::Empty | ProviderResponse::HttpStatus(404) => String::new(),
        ProviderResponse::ProviderError { message, .. } => query_error(LABEL, message),
        ProviderResponse::HttpStatus(status) => query_returned(LABEL, *status),
    }
}

pub(crate) fn classify(fetched: &Fetched) -> Result<ProviderResponse<VideoList>> {
    if fetched.is_success() {
        let list: VideoList = decode_json(LABEL, &fetched.body)?;
        return Ok(ProviderResponse::from_payload(list, |l| !l.items.is_empty()));
    }

    let error = serde_json::from_str::<ApiErrorBody>(&fetched.body)
        .ok()
        .and_then(|body| body.error);
    Ok(match error {
        Some(err) if err.code == 404 => ProviderResponse::HttpStatus(404),
        Some(err) if !err.message.is_empty() => ProviderResponse::ProviderError {
            code: err.code.to_string(),
            message: err.message,
        },
        _ => ProviderResponse::HttpStatus(fetched.status),
    })
}

// ─────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────

/// YouTube Data API v3 client.
pub struct YouTube {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl YouTube {
    /// Fails fast when no API key is configured, even before link detection.
    pub fn new(config: &ApiKeyConfig, http: &HttpConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(QueryError::Config {
                provider: LABEL,
                setting: "providers.youtube.apiKey",
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
impl QueryProvider for YouTube {
    fn kind(&self) -> ProviderKind {
        ProviderKind::YouTube
    }

    async fn fetch(&self, input: &str) -> Result<Option<ProviderPayload>> {
        let Some(id) = extract_video_id(input) else {
            return Ok(None);
        };
        debug!(video_id = %id, "looking up video");

        let url = endpoint(&self.api_base, &["youtube", "v3", "videos"])?;
        let request = self.client.get(url).query(&[
            ("part", "snippet,contentDetails"),
            ("id", id.as_str()),
            ("key", self.api_key.as_str()),
        ]);

        let fetched = send(LABEL, request).await?;
        Ok(Some(ProviderPayload::YouTube(classify(&fetched)?)))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
