//! Nominatim geocoding client.
//!
//! Forward geocoding turns free text into coordinates and a display
//! address; reverse geocoding names a map coordinate. Nominatim returns
//! coordinates as JSON strings, so both directions parse them explicitly.

use serde::Deserialize;
use tracing::debug;

use crate::domain::GeoPoint;

use super::error::GeocodeError;

/// Default Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim requires an identifying User-Agent.
const USER_AGENT: &str = "trip-server/0.1 (itinerary planner)";

/// A forward-geocoded place.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub point: GeoPoint,
    pub display_name: String,
}

/// A reverse-geocoded place.
#[derive(Debug, Clone, PartialEq)]
pub struct ReversedPlace {
    pub name: String,
    pub address: String,
}

/// One result entry from the Nominatim search endpoint.
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Response from the Nominatim reverse endpoint.
#[derive(Debug, Deserialize)]
struct ReverseResult {
    name: Option<String>,
    display_name: Option<String>,
}

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    /// Base URL of the geocoding service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocodeConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Geocoding client.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeocodeClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GeocodeConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Forward geocode: free text to coordinates.
    ///
    /// Returns `Ok(None)` when the service has no match; that is a normal
    /// outcome for vague queries, not an error.
    pub async fn search(&self, query: &str) -> Result<Option<GeocodedPlace>, GeocodeError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let results: Vec<SearchResult> =
            response.json().await.map_err(|e| GeocodeError::Json {
                message: e.to_string(),
            })?;

        let Some(first) = results.into_iter().next() else {
            debug!(query, "no geocoding match");
            return Ok(None);
        };

        let point = parse_coordinates(&first.lat, &first.lon)?;
        Ok(Some(GeocodedPlace {
            point,
            display_name: first.display_name,
        }))
    }

    /// Reverse geocode: coordinates to a name and address.
    ///
    /// Returns `Ok(None)` for coordinates the service cannot name (open
    /// ocean, for instance).
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<ReversedPlace>, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "jsonv2".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let result: ReverseResult = response.json().await.map_err(|e| GeocodeError::Json {
            message: e.to_string(),
        })?;

        let address = result.display_name.unwrap_or_default();
        if address.is_empty() && result.name.is_none() {
            return Ok(None);
        }

        Ok(Some(ReversedPlace {
            name: result.name.unwrap_or_else(|| address.clone()),
            address,
        }))
    }
}

fn parse_coordinates(lat: &str, lon: &str) -> Result<GeoPoint, GeocodeError> {
    let parse = |s: &str| {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| GeocodeError::BadCoordinates {
                message: format!("{s:?} is not a coordinate"),
            })
    };
    Ok(GeoPoint::new(parse(lat)?, parse(lon)?))
}
