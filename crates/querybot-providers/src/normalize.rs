//! Normalization — one classified provider outcome in, one status line out.
//!
//! Pure and deterministic: no I/O, no clocks, the same payload always
//! renders to the same bytes.

use crate::registry::ProviderKind;
use crate::response::ProviderResponse;
use crate::{bing, github, google, weather, wolfram, youtube};

/// A classified outcome tagged with the provider that produced it.
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderPayload {
    Bing(ProviderResponse<bing::BingAnswer>),
    Google(ProviderResponse<google::SearchResponse>),
    Weather(ProviderResponse<weather::WeatherReport>),
    /// The knowledge engine echoes the query into its fallback link.
    Wolfram {
        query: String,
        response: ProviderResponse<wolfram::QueryResult>,
    },
    GithubStars(ProviderResponse<github::StarCount>),
    YouTube(ProviderResponse<youtube::VideoList>),
}

impl ProviderPayload {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Bing(_) => ProviderKind::Bing,
            Self::Google(_) => ProviderKind::Google,
            Self::Weather(_) => ProviderKind::Weather,
            Self::Wolfram { .. } => ProviderKind::Wolfram,
            Self::GithubStars(_) => ProviderKind::GithubStars,
            Self::YouTube(_) => ProviderKind::YouTube,
        }
    }
}

/// Render a payload as a single chat status line.
///
/// The empty string means "say nothing" (video lookups only).
pub fn normalize(payload: &ProviderPayload) -> String {
    match payload {
        ProviderPayload::Bing(response) => bing::normalize(response),
        ProviderPayload::Google(response) => google::normalize(response),
        ProviderPayload::Weather(response) => weather::normalize(response),
        ProviderPayload::Wolfram { query, response } => wolfram::normalize(query, response),
        ProviderPayload::GithubStars(response) => github::normalize(response),
        ProviderPayload::YouTube(response) => youtube::normalize(response),
    }
}
