//! Wolfram|Alpha — interpretation pod `=>` result pod, with fallbacks.
//!
//! Selection, in priority order:
//! 1. unsuccessful with suggestions → "Did you mean: <first suggestion>"
//! 2. unsuccessful without suggestions → "No results found."
//! 3. successful, but no usable second pod → first pod `=>` web link
//! 4. otherwise → first pod `=>` second pod

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use querybot_core::config::schema::{HttpConfig, WolframConfig};
use querybot_core::format::{query_error, BOLD};
use querybot_core::{QueryError, Result};

use crate::http::{api_base, build_client, decode_xml, endpoint, send};
use crate::normalize::ProviderPayload;
use crate::registry::ProviderKind;
use crate::response::ProviderResponse;
use crate::traits::QueryProvider;

const LABEL: &str = "Wolfram";
const DEFAULT_API_BASE: &str = "https://api.wolframalpha.com";
const WEB_UI: &str = "http://www.wolframalpha.com/input/?i=";

// ─────────────────────────────────────────────
// Wire types (queryresult XML)
// ─────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryResult {
    #[serde(rename = "@success")]
    pub success: bool,
    #[serde(rename = "@error")]
    pub error: bool,
    #[serde(rename = "@parsetiming")]
    pub parse_timing: f64,
    #[serde(rename = "@numpods")]
    pub num_pods: u32,
    #[serde(rename = "pod")]
    pub pods: Vec<Pod>,
    pub didyoumeans: DidYouMeans,
    #[serde(rename = "error")]
    pub error_detail: Option<ErrorDetail>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Pod {
    #[serde(rename = "@title")]
    pub title: String,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "subpod")]
    pub subpods: Vec<Subpod>,
}

impl Pod {
    /// The pod's first plain-text entry, if it has one.
    pub fn first_text(&self) -> Option<&str> {
        self.subpods.first().map(|s| s.plaintext.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Subpod {
    pub plaintext: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DidYouMeans {
    #[serde(rename = "didyoumean")]
    pub items: Vec<DidYouMean>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DidYouMean {
    #[serde(rename = "$text")]
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    pub code: String,
    pub msg: String,
}

// ─────────────────────────────────────────────
// Formatting
// ─────────────────────────────────────────────

/// Link to the web UI for a query, form-encoded like a browser would.
pub fn web_link(query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{WEB_UI}{encoded}")
}

/// Render a Wolfram|Alpha result for `query` as one status line.
pub fn normalize(query: &str, response: &ProviderResponse<QueryResult>) -> String {
    match response {
        ProviderResponse::Success(result) => format_result(query, result),
        ProviderResponse::Empty => format!("{BOLD}{LABEL}:{BOLD} No results found."),
        ProviderResponse::ProviderError { message, .. } => query_error(LABEL, message),
        ProviderResponse::HttpStatus(status) => {
            format!("{BOLD}{LABEL}:{BOLD} Server response was {status}")
        }
    }
}

fn format_result(query: &str, result: &QueryResult) -> String {
    let prefix = format!("{BOLD}{LABEL} ({BOLD}{:.2}ms{BOLD}):{BOLD}", result.parse_timing);

    if !result.success {
        return match result.didyoumeans.items.first() {
            Some(suggestion) => format!("{prefix} Did you mean: {}", suggestion.text),
            None => format!("{prefix} No results found."),
        };
    }

    // An empty or missing interpretation pod has nothing to anchor a line on.
    let interpretation = match result.pods.first().and_then(Pod::first_text) {
        Some(text) if !text.is_empty() => text,
        _ => return format!("{prefix} No results found."),
    };

    match result.pods.get(1).and_then(Pod::first_text) {
        Some(answer) if !answer.is_empty() => {
            format!("{prefix} {interpretation} {BOLD}=>{BOLD} {answer}")
        }
        _ => format!(
            "{prefix} {interpretation} {BOLD}=>{BOLD} {}",
            web_link(query)
        ),
    }
}

/// An `error='true'` result carries its reason in `<error><msg>`.
fn classify_result(result: QueryResult) -> ProviderResponse<QueryResult> {
    if result.error {
        if let Some(detail) = &result.error_detail {
            return ProviderResponse::ProviderError {
                code: detail.code.clone(),
                message: detail.msg.clone(),
            };
        }
    }
    ProviderResponse::Success(result)
}

// ─────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────

/// Wolfram|Alpha v2 full results API client (plaintext format).
pub struct Wolfram {
    client: reqwest::Client,
    api_base: String,
    app_id: String,
}

impl Wolfram {
    /// Fails fast when no app ID is configured.
    pub fn new(config: &WolframConfig, http: &HttpConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(QueryError::Config {
                provider: LABEL,
                setting: "providers.wolfram.appId",
            });
        }
        Ok(Self {
            client: build_client(http),
            api_base: api_base(config.api_base.as_deref(), DEFAULT_API_BASE),
            app_id: config.app_id.clone(),
        })
    }
}

#[async_trait]
impl QueryProvider for Wolfram {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Wolfram
    }

    async fn fetch(&self, input: &str) -> Result<Option<ProviderPayload>> {
        let url = endpoint(&self.api_base, &["v2", "query"])?;
        debug!(query = %input, "querying wolfram");

        let request = self.client.get(url).query(&[
            ("format", "plaintext"),
            ("input", input),
            ("appid", self.app_id.as_str()),
        ]);

        let fetched = send(LABEL, request).await?;
        let response = if fetched.is_success() {
            classify_result(decode_xml(LABEL, &fetched.body)?)
        } else {
            ProviderResponse::HttpStatus(fetched.status)
        };

        Ok(Some(ProviderPayload::Wolfram {
            query: input.to_string(),
            response,
        }))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pod(text: &str) -> Pod {
        Pod {
            title: "Pod".into(),
            id: "Pod".into(),
            subpods: vec![Subpod {
                plaintext: text.into(),
            }],
        }
    }

    fn result(success: bool, pods: Vec<Pod>, suggestions: &[&str]) -> QueryResult {
        QueryResult {
            success,
            parse_timing: 0.231,
            num_pods: pods.len() as u32,
            pods,
            didyoumeans: DidYouMeans {
                items: suggestions
                    .iter()
                    .map(|s| DidYouMean { text: s.to_string() })
                    .collect(),
            },
            ..Default::default()
        }
    }

    fn make_wolfram(api_base: &str) -> Wolfram {
        let config = WolframConfig {
            app_id: "APP-123".into(),
            api_base: Some(api_base.into()),
        };
        Wolfram::new(&config, &HttpConfig::default()).unwrap()
    }

    #[test]
    fn test_did_you_mean_uses_first_suggestion() {
        let r = result(false, vec![], &["pie", "pi day"]);
        let out = normalize("pei", &ProviderResponse::Success(r));
        assert_eq!(out, "\x02Wolfram (\x020.23ms\x02):\x02 Did you mean: pie");
        assert!(!out.contains("pi day"));
    }

    #[test]
    fn test_unsuccessful_without_suggestions() {
        let r = result(false, vec![], &[]);
        assert_eq!(
            normalize("asdfgh", &ProviderResponse::Success(r)),
            "\x02Wolfram (\x020.23ms\x02):\x02 No results found."
        );
    }

    #[test]
    fn test_single_pod_falls_back_to_link() {
        let r = result(true, vec![pod("population of Norway")], &[]);
        let out = normalize("population of norway?", &ProviderResponse::Success(r));
        assert_eq!(
            out,
            "\x02Wolfram (\x020.23ms\x02):\x02 population of Norway \x02=>\x02 \
             http://www.wolframalpha.com/input/?i=population+of+norway%3F"
        );
    }

    #[test]
    fn test_empty_second_pod_falls_back_to_link() {
        let r = result(true, vec![pod("pi"), pod("")], &[]);
        let out = normalize("pi", &ProviderResponse::Success(r));
        assert!(out.ends_with("pi \x02=>\x02 http://www.wolframalpha.com/input/?i=pi"));
    }

    #[test]
    fn test_two_pods() {
        let r = result(true, vec![pod("pi"), pod("3.1415926535897932384626433832795028841971693993751058209749445923...")], &[]);
        assert_eq!(
            normalize("pi", &ProviderResponse::Success(r)),
            "\x02Wolfram (\x020.23ms\x02):\x02 pi \x02=>\x02 3.1415926535897932384626433832795028841971693993751058209749445923..."
        );
    }

    #[test]
    fn test_successful_with_empty_first_pod() {
        let r = result(true, vec![pod(""), pod("42")], &[]);
        assert_eq!(
            normalize("x", &ProviderResponse::Success(r)),
            "\x02Wolfram (\x020.23ms\x02):\x02 No results found."
        );
        let r = result(true, vec![], &[]);
        assert_eq!(
            normalize("x", &ProviderResponse::Success(r)),
            "\x02Wolfram (\x020.23ms\x02):\x02 No results found."
        );
    }

    #[test]
    fn test_http_status() {
        assert_eq!(
            normalize("x", &ProviderResponse::HttpStatus(502)),
            "\x02Wolfram:\x02 Server response was 502"
        );
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let r = ProviderResponse::Success(result(true, vec![pod("a"), pod("b")], &[]));
        assert_eq!(normalize("a", &r), normalize("a", &r));
    }

    #[test]
    fn test_decode_xml_result() {
        let xml = r#"<?xml version='1.0' encoding='UTF-8'?>
<queryresult success='true' error='false' numpods='2' datatypes='' timedout='' timing='0.9' parsetiming='0.118' parsetimedout='false' version='2.6'>
 <pod title='Input' scanner='Identity' id='Input' position='100' error='false' numsubpods='1'>
  <subpod title=''>
   <plaintext>2 + 2</plaintext>
  </subpod>
 </pod>
 <pod title='Result' scanner='Simplification' id='Result' position='200' error='false' numsubpods='1' primary='true'>
  <subpod title=''>
   <plaintext>4</plaintext>
  </subpod>
  <states count='1'>
   <state name='Step-by-step solution' input='Result__Step-by-step solution' />
  </states>
 </pod>
</queryresult>"#;
        let parsed: QueryResult = decode_xml(LABEL, xml).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.num_pods, 2);
        assert_eq!(parsed.pods[1].first_text(), Some("4"));
        assert_eq!(
            normalize("2+2", &ProviderResponse::Success(parsed)),
            "\x02Wolfram (\x020.12ms\x02):\x02 2 + 2 \x02=>\x02 4"
        );
    }

    #[test]
    fn test_decode_xml_did_you_mean() {
        let xml = r#"<queryresult success='false' error='false' numpods='0' parsetiming='0.04'>
 <didyoumeans count='2'>
  <didyoumean score='0.416' level='medium'>pie</didyoumean>
  <didyoumean score='0.2' level='low'>pi</didyoumean>
 </didyoumeans>
</queryresult>"#;
        let parsed: QueryResult = decode_xml(LABEL, xml).unwrap();
        assert_eq!(
            normalize("pei", &ProviderResponse::Success(parsed)),
            "\x02Wolfram (\x020.04ms\x02):\x02 Did you mean: pie"
        );
    }

    #[test]
    fn test_error_result_is_provider_error() {
        let xml = r#"<queryresult success='false' error='true' numpods='0' parsetiming='0.0'>
 <error>
  <code>1</code>
  <msg>Invalid appid</msg>
 </error>
</queryresult>"#;
        let parsed: QueryResult = decode_xml(LABEL, xml).unwrap();
        let classified = classify_result(parsed);
        assert_eq!(
            normalize("x", &classified),
            "\x02Wolfram: Query error Invalid appid"
        );
    }

    #[test]
    fn test_new_requires_app_id() {
        let err = Wolfram::new(&WolframConfig::default(), &HttpConfig::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("providers.wolfram.appId"));
    }

    #[tokio::test]
    async fn test_query_round_trip() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/query"))
            .and(query_param("appid", "APP-123"))
            .and(query_param("input", "capital of norway"))
            .and(query_param("format", "plaintext"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<queryresult success='true' error='false' numpods='1' parsetiming='0.5'>\
                 <pod title='Input interpretation' id='Input'><subpod title=''>\
                 <plaintext>Norway | capital city</plaintext></subpod></pod></queryresult>",
            ))
            .mount(&mock_server)
            .await;

        let out = make_wolfram(&mock_server.uri())
            .query("capital of norway")
            .await
            .unwrap();
        assert_eq!(
            out,
            "\x02Wolfram (\x020.50ms\x02):\x02 Norway | capital city \x02=>\x02 \
             http://www.wolframalpha.com/input/?i=capital+of+norway"
        );
    }

    #[tokio::test]
    async fn test_query_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/query"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let out = make_wolfram(&mock_server.uri()).query("x").await.unwrap();
        assert_eq!(out, "\x02Wolfram:\x02 Server response was 403");
    }
}
