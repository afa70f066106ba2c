//! GitHub stars — one repository, or the sum over an owner's repositories.

use async_trait::async_trait;
use reqwest::header::LINK;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use querybot_core::config::schema::{GithubConfig, HttpConfig};
use querybot_core::format::{no_results, query_error, query_returned, BOLD};
use querybot_core::{QueryError, Result};

use crate::http::{api_base, build_client, decode_json, endpoint, send, Fetched};
use crate::normalize::ProviderPayload;
use crate::registry::ProviderKind;
use crate::response::ProviderResponse;
use crate::traits::QueryProvider;

const LABEL: &str = "GitHub";
const DEFAULT_API_BASE: &str = "https://api.github.com";
const PER_PAGE: &str = "50";

/// The fields of a repository we care about.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub full_name: String,
    pub fork: bool,
    pub stargazers_count: Option<u64>,
}

impl Repository {
    fn stars(&self) -> u64 {
        self.stargazers_count.unwrap_or(0)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GithubErrorBody {
    message: String,
}

/// Aggregated star count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarCount {
    pub total: u64,
}

/// What the user asked about.
#[derive(Debug, PartialEq, Eq)]
pub enum StarTarget<'a> {
    Repo { owner: &'a str, repo: &'a str },
    Owner(&'a str),
}

/// `owner/repo` or a bare `owner`.
pub fn parse_target(input: &str) -> Result<StarTarget<'_>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(QueryError::InvalidInput("must supply an owner or owner/repo".into()));
    }
    match input.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
            Ok(StarTarget::Repo { owner, repo })
        }
        Some(_) => Err(QueryError::InvalidInput(format!("malformed repository `{input}`"))),
        None => Ok(StarTarget::Owner(input)),
    }
}

/// The `page` parameter of the `rel="next"` entry of a `Link` header.
pub fn next_page(link: &str) -> Option<u32> {
    link.split(',').find_map(|entry| {
        let (target, params) = entry.split_once(';')?;
        if !params.split(';').any(|p| p.trim() == r#"rel="next""#) {
            return None;
        }
        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        let url = Url::parse(target).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    })
}

/// Render a star count outcome as one status line.
pub fn normalize(response: &ProviderResponse<StarCount>) -> String {
    match response {
        ProviderResponse::Success(count) => format!("{BOLD}{LABEL}:{BOLD} {}", count.total),
        ProviderResponse::Empty => no_results(LABEL),
        ProviderResponse::ProviderError { message, .. } => query_error(LABEL, message),
        ProviderResponse::HttpStatus(status) => query_returned(LABEL, *status),
    }
}

fn classify_failure(fetched: &Fetched) -> ProviderResponse<StarCount> {
    match serde_json::from_str::<GithubErrorBody>(&fetched.body) {
        Ok(body) if !body.message.is_empty() => ProviderResponse::ProviderError {
            code: fetched.status.to_string(),
            message: body.message,
        },
        _ => ProviderResponse::HttpStatus(fetched.status),
    }
}

// ─────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────

/// GitHub REST API client for star counts.
pub struct GithubStars {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl GithubStars {
    /// Fails fast when no token is configured.
    pub fn new(config: &GithubConfig, http: &HttpConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(QueryError::Config {
                provider: LABEL,
                setting: "providers.github.token",
            });
        }
        Ok(Self {
            client: build_client(http),
            api_base: api_base(config.api_base.as_deref(), DEFAULT_API_BASE),
            token: config.token.clone(),
        })
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn repo_stars(&self, owner: &str, repo: &str) -> Result<ProviderResponse<StarCount>> {
        let url = endpoint(&self.api_base, &["repos", owner, repo])?;
        let fetched = send(LABEL, self.get(url)).await?;
        if !fetched.is_success() {
            return Ok(classify_failure(&fetched));
        }

        let repository: Repository = decode_json(LABEL, &fetched.body)?;
        Ok(ProviderResponse::Success(StarCount {
            total: repository.stars(),
        }))
    }

    /// Walk the owner's repositories page by page, skipping forks.
    async fn owner_stars(&self, owner: &str) -> Result<ProviderResponse<StarCount>> {
        let url = endpoint(&self.api_base, &["users", owner, "repos"])?;
        let mut page: u32 = 1;
        let mut total: u64 = 0;
        let mut counted: usize = 0;

        loop {
            let request = self.get(url.clone()).query(&[
                ("type", "owner"),
                ("per_page", PER_PAGE),
                ("page", &page.to_string()),
            ]);
            let fetched = send(LABEL, request).await?;
            if !fetched.is_success() {
                return Ok(classify_failure(&fetched));
            }

            let repos: Vec<Repository> = decode_json(LABEL, &fetched.body)?;
            if repos.is_empty() {
                break;
            }

            for repo in repos.iter().filter(|r| !r.fork) {
                total += repo.stars();
                counted += 1;
            }
            debug!(owner, page, repos = repos.len(), total, "counted page");

            let next = fetched
                .headers
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_page);
            match next {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        if counted == 0 {
            return Ok(ProviderResponse::Empty);
        }
        Ok(ProviderResponse::Success(StarCount { total }))
    }
}

#[async_trait]
impl QueryProvider for GithubStars {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GithubStars
    }

    async fn fetch(&self, input: &str) -> Result<Option<ProviderPayload>> {
        let response = match parse_target(input)? {
            StarTarget::Repo { owner, repo } => self.repo_stars(owner, repo).await?,
            StarTarget::Owner(owner) => self.owner_stars(owner).await?,
        };
        Ok(Some(ProviderPayload::GithubStars(response)))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
