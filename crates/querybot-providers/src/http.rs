//! Shared HTTP plumbing: client construction, endpoint building, body decoding.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use querybot_core::config::schema::HttpConfig;
use querybot_core::{QueryError, Result};

/// Build the HTTP client every provider uses, with the configured timeout.
pub(crate) fn build_client(http: &HttpConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(http.user_agent.as_str())
        .timeout(Duration::from_secs(http.timeout_secs))
        .build()
        .unwrap_or_default()
}

/// Resolve the API base: config override, else the provider default.
pub(crate) fn api_base(configured: Option<&str>, default: &str) -> String {
    configured
        .filter(|base| !base.is_empty())
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}

/// Append percent-encoded path segments to an API base.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| QueryError::InvalidInput(format!("bad API base `{base}`: {e}")))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| QueryError::InvalidInput(format!("API base `{base}` cannot take a path")))?;
        path.pop_if_empty().extend(segments);
    }
    Ok(url)
}

/// A response read to the end.
#[derive(Debug)]
pub(crate) struct Fetched {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl Fetched {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Send a request and read the whole body. Only transport failures error.
pub(crate) async fn send(provider: &'static str, request: RequestBuilder) -> Result<Fetched> {
    let response = request.send().await.map_err(|e| {
        warn!(provider, error = %e, "HTTP request failed");
        QueryError::Transport(e)
    })?;

    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.text().await?;

    debug!(provider, status, bytes = body.len(), "response received");

    Ok(Fetched {
        status,
        headers,
        body,
    })
}

/// Decode a JSON body, mapping failures to [`QueryError::Decode`].
pub(crate) fn decode_json<T: DeserializeOwned>(provider: &'static str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| QueryError::decode(provider, e))
}

/// Decode an XML body, mapping failures to [`QueryError::Decode`].
pub(crate) fn decode_xml<T: DeserializeOwned>(provider: &'static str, body: &str) -> Result<T> {
    quick_xml::de::from_str(body).map_err(|e| QueryError::decode(provider, e))
}
