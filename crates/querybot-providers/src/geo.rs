//! Place resolution — a static table of well-known places, then GeoNames.
//!
//! Not a chat provider on its own: the weather provider consumes the
//! resolved [`Location`] and the typed [`QueryError::PlaceNotFound`].

use serde::Deserialize;
use tracing::debug;

use querybot_core::config::schema::GeonamesConfig;
use querybot_core::{QueryError, Result};

use crate::http::{api_base, decode_json, endpoint, send};

const PROVIDER: &str = "GeoNames";
const DEFAULT_API_BASE: &str = "https://secure.geonames.org";

/// A place resolved down to the path the forecast service keys on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub country: String,
    pub region: String,
    /// Only the static table carries a county level.
    pub county: Option<String>,
    pub city: String,
}

/// A pre-resolved place that never needs a remote lookup.
#[derive(Clone, Debug)]
pub struct KnownPlace {
    /// Lowercase lookup key.
    pub key: &'static str,
    pub country: &'static str,
    pub region: &'static str,
    pub county: &'static str,
    pub city: &'static str,
}

impl KnownPlace {
    pub fn to_location(&self) -> Location {
        Location {
            country: self.country.to_string(),
            region: self.region.to_string(),
            county: Some(self.county.to_string()),
            city: self.city.to_string(),
        }
    }
}

/// Places resolved ahead of time, checked before any remote lookup.
pub static KNOWN_PLACES: &[KnownPlace] = &[
    KnownPlace {
        key: "oslo",
        country: "Norway",
        region: "Oslo",
        county: "Oslo",
        city: "Oslo",
    },
    KnownPlace {
        key: "sandvika",
        country: "Norway",
        region: "Akershus",
        county: "Bærum",
        city: "Sandvika",
    },
];

/// Case-insensitive lookup in [`KNOWN_PLACES`].
pub fn lookup_known_place(query: &str) -> Option<&'static KnownPlace> {
    let key = query.trim().to_lowercase();
    KNOWN_PLACES.iter().find(|p| p.key == key)
}

// ─────────────────────────────────────────────
// GeoNames
// ─────────────────────────────────────────────

/// `searchJSON` response. Errors come back as a 200 with `status` set.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GeonamesResponse {
    pub geonames: Vec<GeonamesPlace>,
    pub status: Option<GeonamesStatus>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeonamesPlace {
    pub country_name: String,
    pub admin_name1: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GeonamesStatus {
    pub message: String,
    pub value: i64,
}

/// Pick the most relevant match, or report the place as not found.
pub fn select_location(query: &str, response: GeonamesResponse) -> Result<Location> {
    if let Some(status) = response.status {
        return Err(QueryError::Provider {
            provider: PROVIDER,
            message: format!("{} (code {})", status.message, status.value),
        });
    }

    let first = response
        .geonames
        .into_iter()
        .next()
        .ok_or_else(|| QueryError::PlaceNotFound(query.to_string()))?;

    Ok(Location {
        country: first.country_name,
        region: first.admin_name1,
        county: None,
        city: first.name,
    })
}

/// GeoNames full-text search client.
pub struct GeoNames {
    client: reqwest::Client,
    api_base: String,
    username: String,
}

impl GeoNames {
    /// Fails fast when no GeoNames username is configured.
    pub fn new(config: &GeonamesConfig, client: reqwest::Client) -> Result<Self> {
        if !config.is_configured() {
            return Err(QueryError::Config {
                provider: PROVIDER,
                setting: "providers.geonames.username",
            });
        }
        Ok(Self {
            client,
            api_base: api_base(config.api_base.as_deref(), DEFAULT_API_BASE),
            username: config.username.clone(),
        })
    }

    /// Resolve a free-text place name to its most relevant match.
    pub async fn locate(&self, query: &str) -> Result<Location> {
        let url = endpoint(&self.api_base, &["searchJSON"])?;
        debug!(query = %query, "geocoding via geonames");

        let request = self.client.get(url).query(&[
            ("q", query),
            ("maxRows", "1"),
            ("orderby", "relevance"),
            ("username", self.username.as_str()),
        ]);

        let fetched = send(PROVIDER, request).await?;
        if !fetched.is_success() {
            return Err(QueryError::Provider {
                provider: PROVIDER,
                message: format!("server response was {}", fetched.status),
            });
        }

        let response: GeonamesResponse = decode_json(PROVIDER, &fetched.body)?;
        select_location(query, response)
    }
}
