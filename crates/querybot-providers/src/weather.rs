//! Weather from YR — resolve the place, then read the current forecast slot.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use querybot_core::config::schema::{GeonamesConfig, HttpConfig, WeatherConfig};
use querybot_core::format::{query_returned, BOLD};
use querybot_core::{QueryError, Result};

use crate::geo::{lookup_known_place, GeoNames, Location};
use crate::http::{api_base, build_client, decode_xml, endpoint, send};
use crate::normalize::ProviderPayload;
use crate::registry::ProviderKind;
use crate::response::ProviderResponse;
use crate::traits::QueryProvider;

const LABEL: &str = "Weather";
const SOURCE: &str = "YR.no";
const DEFAULT_API_BASE: &str = "https://www.yr.no";

// ─────────────────────────────────────────────
// Wire types (forecast.xml)
// ─────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WeatherData {
    pub forecast: Forecast,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Forecast {
    pub tabular: Tabular,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Tabular {
    #[serde(rename = "time")]
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Deserialize)]
pub struct TimeSlot {
    pub symbol: Symbol,
    pub temperature: Temperature,
}

#[derive(Debug, Deserialize)]
pub struct Symbol {
    #[serde(rename = "@name")]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Temperature {
    #[serde(rename = "@value")]
    pub value: i32,
}

// ─────────────────────────────────────────────
// Selection + formatting
// ─────────────────────────────────────────────

/// Current conditions for a resolved place.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherReport {
    pub location: Location,
    pub condition: String,
    pub temperature: i32,
}

/// The first tabular slot is the current forecast.
pub fn select(location: &Location, data: &WeatherData) -> ProviderResponse<WeatherReport> {
    match data.forecast.tabular.slots.first() {
        Some(slot) => ProviderResponse::Success(WeatherReport {
            location: location.clone(),
            condition: slot.symbol.name.clone(),
            temperature: slot.temperature.value,
        }),
        None => ProviderResponse::Empty,
    }
}

/// Render a weather outcome as one status line.
pub fn normalize(response: &ProviderResponse<WeatherReport>) -> String {
    let prefix = format!("{BOLD}{LABEL} ({BOLD}{SOURCE}{BOLD}):{BOLD}");
    match response {
        ProviderResponse::Success(report) => format!(
            "{prefix} {}, {} {BOLD}=>{BOLD} {}, {} \u{00B0}C",
            report.location.city, report.location.country, report.condition, report.temperature
        ),
        ProviderResponse::Empty => format!("{prefix} No forecast available."),
        ProviderResponse::ProviderError { message, .. } => format!("{prefix} {message}"),
        ProviderResponse::HttpStatus(status) => query_returned(LABEL, *status),
    }
}

/// Path segments of the forecast document for a location.
fn forecast_path(location: &Location) -> Vec<&str> {
    let mut segments = vec!["place", location.country.as_str(), location.region.as_str()];
    if let Some(county) = &location.county {
        segments.push(county.as_str());
    }
    segments.push(location.city.as_str());
    segments.push("forecast.xml");
    segments
}

// ─────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────

/// YR forecast client with place resolution.
pub struct WeatherForecast {
    client: reqwest::Client,
    api_base: String,
    geonames: GeonamesConfig,
}

impl WeatherForecast {
    /// The GeoNames username is checked lazily: places in the static table
    /// never need it.
    pub fn new(config: &WeatherConfig, geonames: &GeonamesConfig, http: &HttpConfig) -> Self {
        Self {
            client: build_client(http),
            api_base: api_base(config.api_base.as_deref(), DEFAULT_API_BASE),
            geonames: geonames.clone(),
        }
    }

    /// Static table first, remote geocoding second.
    pub async fn resolve(&self, query: &str) -> Result<Location> {
        if let Some(place) = lookup_known_place(query) {
            debug!(query = %query, "resolved from known places");
            return Ok(place.to_location());
        }
        let geocoder = GeoNames::new(&self.geonames, self.client.clone())?;
        geocoder.locate(query).await
    }
}

#[async_trait]
impl QueryProvider for WeatherForecast {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Weather
    }

    async fn fetch(&self, input: &str) -> Result<Option<ProviderPayload>> {
        let location = match self.resolve(input).await {
            Ok(location) => location,
            Err(err @ QueryError::PlaceNotFound(_)) => {
                return Ok(Some(ProviderPayload::Weather(ProviderResponse::ProviderError {
                    code: "place_not_found".into(),
                    message: err.to_string(),
                })));
            }
            Err(err) => return Err(err),
        };

        let url = endpoint(&self.api_base, &forecast_path(&location))?;
        debug!(url = %url, "fetching forecast");

        let fetched = send(LABEL, self.client.get(url)).await?;
        if !fetched.is_success() {
            return Ok(Some(ProviderPayload::Weather(ProviderResponse::HttpStatus(
                fetched.status,
            ))));
        }

        let data: WeatherData = decode_xml(LABEL, &fetched.body)?;
        Ok(Some(ProviderPayload::Weather(select(&location, &data))))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
