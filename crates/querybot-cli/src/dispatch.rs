//! Chat-line dispatcher — maps `!alias <input>` lines onto providers.
//!
//! Lines that are not commands are scanned for a video link; when there is
//! none the line is ignored.

use anyhow::{Context, Result};
use tracing::debug;

use querybot_core::Config;
use querybot_providers::registry::{self, find_by_alias, ProviderKind};
use querybot_providers::youtube::find_link;

/// What a single chat line asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch<'a> {
    /// An explicit `!alias` command.
    Command { kind: ProviderKind, input: &'a str },
    /// A plain line carrying a video link.
    Video(&'a str),
    /// Nothing to do.
    Ignore,
}

/// Classify a chat line without touching the network.
pub fn parse_line(line: &str) -> Dispatch<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Dispatch::Ignore;
    }

    if line.starts_with('!') {
        let (alias, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        if let Some(spec) = find_by_alias(alias) {
            return Dispatch::Command {
                kind: spec.kind,
                input: rest.trim(),
            };
        }
    }

    if find_link(line).is_some() {
        Dispatch::Video(line)
    } else {
        Dispatch::Ignore
    }
}

/// Run whatever a chat line asks for. `None` means stay silent.
pub async fn handle_line(line: &str, config: &Config) -> Result<Option<String>> {
    let (kind, input) = match parse_line(line) {
        Dispatch::Command { kind, input } => (kind, input),
        Dispatch::Video(line) => {
            if !registry::is_configured(ProviderKind::YouTube, config) {
                debug!("video link seen but youtube is not configured");
                return Ok(None);
            }
            (ProviderKind::YouTube, line)
        }
        Dispatch::Ignore => return Ok(None),
    };

    let output = registry::query(kind, input, config)
        .await
        .with_context(|| format!("{kind} query failed"))?;
    Ok((!output.is_empty()).then_some(output))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line("!w oslo"),
            Dispatch::Command {
                kind: ProviderKind::Weather,
                input: "oslo"
            }
        );
        assert_eq!(
            parse_line("  !WA   2 + 2 "),
            Dispatch::Command {
                kind: ProviderKind::Wolfram,
                input: "2 + 2"
            }
        );
        assert_eq!(
            parse_line("!stars"),
            Dispatch::Command {
                kind: ProviderKind::GithubStars,
                input: ""
            }
        );
    }

    #[test]
    fn test_parse_plain_lines() {
        assert_eq!(parse_line("hello world"), Dispatch::Ignore);
        assert_eq!(parse_line(""), Dispatch::Ignore);
        assert_eq!(parse_line("!nope something"), Dispatch::Ignore);
        assert_eq!(
            parse_line("look https://youtu.be/abc"),
            Dispatch::Video("look https://youtu.be/abc")
        );
    }

    #[tokio::test]
    async fn test_plain_line_is_silent() {
        let out = handle_line("hello world", &Config::default()).await.unwrap();
        assert_eq!(out, None);
    }

    #[tokio::test]
    async fn test_video_link_without_key_is_silent() {
        let out = handle_line("https://youtu.be/abc", &Config::default())
            .await
            .unwrap();
        assert_eq!(out, None);
    }

    #[tokio::test]
    async fn test_command_without_credentials_errors() {
        let err = handle_line("!b rust", &Config::default()).await.unwrap_err();
        assert!(format!("{err:#}").contains("providers.bing.apiKey"));
    }

    #[tokio::test]
    async fn test_known_place_weather_command() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/place/Norway/Oslo/Oslo/Oslo/forecast.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<weatherdata><forecast><tabular>
                    <time from="2024-01-01T12:00:00" to="2024-01-01T18:00:00">
                      <symbol number="4" name="Cloudy" />
                      <temperature unit="celsius" value="-2" />
                    </time>
                </tabular></forecast></weatherdata>"#,
            ))
            .mount(&mock_server)
            .await;

        let mut config = Config::default();
        config.providers.weather.api_base = Some(mock_server.uri());

        let out = handle_line("!weather Oslo", &config).await.unwrap();
        assert_eq!(
            out.as_deref(),
            Some("\x02Weather (\x02YR.no\x02):\x02 Oslo, Norway \x02=>\x02 Cloudy, -2 °C")
        );
    }

    #[tokio::test]
    async fn test_video_line_dispatches_to_youtube() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/youtube/v3/videos"))
            .and(query_param("id", "kNcaiTM77cM"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{
                    "id": "kNcaiTM77cM",
                    "snippet": { "title": "How To Catch Fish in the Sewer" },
                    "contentDetails": { "duration": "PT2M51S" }
                }]
            })))
            .mount(&mock_server)
            .await;

        let mut config = Config::default();
        config.providers.youtube.api_key = "k".into();
        config.providers.youtube.api_base = Some(mock_server.uri());

        let out = handle_line("lol https://www.youtube.com/watch?v=kNcaiTM77cM", &config)
            .await
            .unwrap();
        assert_eq!(
            out.as_deref(),
            Some("\x02YouTube (\x022m51s\x02):\x02 How To Catch Fish in the Sewer")
        );
    }
}
