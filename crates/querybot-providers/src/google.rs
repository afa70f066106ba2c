//! Google Custom Search — first result with the provider's formatted count.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use querybot_core::config::schema::{GoogleConfig, HttpConfig};
use querybot_core::format::{no_results, query_error, query_returned, BOLD};
use querybot_core::{QueryError, Result};

use crate::http::{api_base, build_client, decode_json, endpoint, send, Fetched};
use crate::normalize::ProviderPayload;
use crate::registry::ProviderKind;
use crate::response::ProviderResponse;
use crate::traits::QueryProvider;

const LABEL: &str = "Google";
const DEFAULT_API_BASE: &str = "https://www.googleapis.com";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResponse {
    pub items: Vec<SearchItem>,
    pub search_information: SearchInformation,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchItem {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchInformation {
    pub total_results: String,
    pub formatted_total_results: String,
}

impl SearchInformation {
    /// The human-formatted count, falling back to the raw one.
    fn display_total(&self) -> &str {
        if self.formatted_total_results.is_empty() {
            &self.total_results
        } else {
            &self.formatted_total_results
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GoogleErrorBody {
    error: Option<GoogleError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GoogleError {
    code: u16,
    message: String,
}

/// Render a Google outcome as one status line.
pub fn normalize(response: &ProviderResponse<SearchResponse>) -> String {
    match response {
        ProviderResponse::Success(results) => match results.items.first() {
            Some(item) => format!(
                "{BOLD}{LABEL} ({BOLD}{} results{BOLD}):{BOLD} {} - {}",
                results.search_information.display_total(),
                item.link,
                item.snippet
            ),
            None => no_results(LABEL),
        },
        ProviderResponse::Empty => no_results(LABEL),
        ProviderResponse::ProviderError { message, .. } => query_error(LABEL, message),
        ProviderResponse::HttpStatus(status) => query_returned(LABEL, *status),
    }
}

pub(crate) fn classify(fetched: &Fetched) -> Result<ProviderResponse<SearchResponse>> {
    if fetched.is_success() {
        let results: SearchResponse = decode_json(LABEL, &fetched.body)?;
        return Ok(ProviderResponse::from_payload(results, |r| !r.items.is_empty()));
    }

    // Error bodies are informative but optional; an unreadable one still
    // leaves the status code to report.
    let error = serde_json::from_str::<GoogleErrorBody>(&fetched.body)
        .ok()
        .and_then(|body| body.error)
        .filter(|e| !e.message.is_empty());

    Ok(match error {
        Some(e) => ProviderResponse::ProviderError {
            code: e.code.to_string(),
            message: e.message,
        },
        None => ProviderResponse::HttpStatus(fetched.status),
    })
}

/// Google Custom Search JSON API client.
pub struct GoogleSearch {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    cx_id: String,
}

impl GoogleSearch {
    /// Fails fast when either the key or the search engine ID is missing.
    pub fn new(config: &GoogleConfig, http: &HttpConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(QueryError::Config {
                provider: LABEL,
                setting: "providers.google.apiKey",
            });
        }
        if config.cx_id.is_empty() {
            return Err(QueryError::Config {
                provider: LABEL,
                setting: "providers.google.cxId",
            });
        }
        Ok(Self {
            client: build_client(http),
            api_base: api_base(config.api_base.as_deref(), DEFAULT_API_BASE),
            api_key: config.api_key.clone(),
            cx_id: config.cx_id.clone(),
        })
    }
}

#[async_trait]
impl QueryProvider for GoogleSearch {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    async fn fetch(&self, input: &str) -> Result<Option<ProviderPayload>> {
        let url = endpoint(&self.api_base, &["customsearch", "v1"])?;
        debug!(query = %input, "searching google");

        let request = self.client.get(url).query(&[
            ("cx", self.cx_id.as_str()),
            ("key", self.api_key.as_str()),
            ("q", input),
            ("num", "1"),
        ]);

        let fetched = send(LABEL, request).await?;
        Ok(Some(ProviderPayload::Google(classify(&fetched)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_search(api_base: &str) -> GoogleSearch {
        let config = GoogleConfig {
            api_key: "g-key".into(),
            cx_id: "cx-123".into(),
            api_base: Some(api_base.into()),
        };
        GoogleSearch::new(&config, &HttpConfig::default()).unwrap()
    }

    #[test]
    fn test_first_item_format() {
        let results = SearchResponse {
            items: vec![
                SearchItem {
                    title: "Go".into(),
                    link: "https://go.dev".into(),
                    snippet: "Build simple, secure, scalable systems".into(),
                },
                SearchItem {
                    title: "Other".into(),
                    link: "https://other.example".into(),
                    snippet: "not this one".into(),
                },
            ],
            search_information: SearchInformation {
                total_results: "1230000".into(),
                formatted_total_results: "1,230,000".into(),
            },
        };
        assert_eq!(
            normalize(&ProviderResponse::Success(results)),
            "\x02Google (\x021,230,000 results\x02):\x02 https://go.dev - Build simple, secure, scalable systems"
        );
    }

    #[test]
    fn test_raw_total_fallback() {
        let info = SearchInformation {
            total_results: "42".into(),
            formatted_total_results: String::new(),
        };
        assert_eq!(info.display_total(), "42");
    }

    #[test]
    fn test_missing_cx_id() {
        let config = GoogleConfig {
            api_key: "g-key".into(),
            ..Default::default()
        };
        let err = GoogleSearch::new(&config, &HttpConfig::default()).err().unwrap();
        assert!(matches!(
            err,
            QueryError::Config {
                setting: "providers.google.cxId",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_query_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("cx", "cx-123"))
            .and(query_param("key", "g-key"))
            .and(query_param("q", "golang"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "customsearch#search",
                "searchInformation": {
                    "searchTime": 0.31,
                    "totalResults": "5400000",
                    "formattedTotalResults": "5,400,000"
                },
                "items": [{
                    "title": "The Go Programming Language",
                    "link": "https://go.dev/",
                    "snippet": "Go is an open source programming language."
                }]
            })))
            .mount(&mock_server)
            .await;

        let out = make_search(&mock_server.uri()).query("golang").await.unwrap();
        assert_eq!(
            out,
            "\x02Google (\x025,400,000 results\x02):\x02 https://go.dev/ - Go is an open source programming language."
        );
    }

    #[tokio::test]
    async fn test_query_no_items() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "searchInformation": { "totalResults": "0", "formattedTotalResults": "0" }
            })))
            .mount(&mock_server)
            .await;

        let out = make_search(&mock_server.uri()).query("zzqqxx").await.unwrap();
        assert_eq!(out, "\x02Google: No results found.\x02");
    }

    #[tokio::test]
    async fn test_query_error_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
            })))
            .mount(&mock_server)
            .await;

        let out = make_search(&mock_server.uri()).query("x").await.unwrap();
        assert_eq!(out, "\x02Google: Query error API key not valid.");
    }

    #[tokio::test]
    async fn test_query_bare_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream broke"))
            .mount(&mock_server)
            .await;

        let out = make_search(&mock_server.uri()).query("x").await.unwrap();
        assert_eq!(out, "\x02Google: Query returned 500");
    }
}
