//! Postal code geocoding against a Nominatim search endpoint
//!
//! Resolves a validated postal code into the search origin. Only the first
//! candidate is used; an empty answer is reported as not found.

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::config::LocatorConfig;
use crate::models::{Location, PostalCode};
use crate::{LocatorError, Result};

pub const LOOKUP_FAILED: &str = "Failed to lookup ZIP code";
pub const POSTAL_CODE_NOT_FOUND: &str = "ZIP code not found";

/// Resolves postal codes into coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve_postal_code(&self, postal_code: &PostalCode) -> Result<Location>;
}

/// A single Nominatim search candidate
#[derive(Debug, Deserialize)]
struct Candidate {
    lat: Coordinate,
    lon: Coordinate,
    display_name: Option<String>,
}

/// Nominatim sends coordinates as numeric strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Option<f64> {
        let value = match self {
            Coordinate::Number(n) => Some(*n),
            Coordinate::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }
}

/// Turn a decoded Nominatim body into the search origin
fn location_from_response(postal_code: &PostalCode, body: Value) -> Result<Location> {
    let Value::Array(candidates) = body else {
        warn!("Geocoding response for {} was not an array", postal_code);
        return Err(LocatorError::not_found(POSTAL_CODE_NOT_FOUND));
    };

    let Some(first) = candidates.into_iter().next() else {
        warn!("No geocoding results for {}", postal_code);
        return Err(LocatorError::not_found(POSTAL_CODE_NOT_FOUND));
    };

    let candidate: Candidate = serde_json::from_value(first).map_err(|e| {
        error!("Malformed geocoding candidate for {}: {}", postal_code, e);
        LocatorError::lookup_failure(LOOKUP_FAILED)
    })?;

    let (Some(latitude), Some(longitude)) = (candidate.lat.value(), candidate.lon.value()) else {
        error!(
            "Unparseable coordinates for {}: {:?}, {:?}",
            postal_code, candidate.lat, candidate.lon
        );
        return Err(LocatorError::lookup_failure(LOOKUP_FAILED));
    };

    let display_name = candidate
        .display_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| postal_code.to_string());

    Ok(Location::new(latitude, longitude, display_name))
}

/// Nominatim client
pub struct NominatimClient {
    client: Client,
    search_url: String,
    country: String,
}

impl NominatimClient {
    /// Create a new client from configuration
    pub fn new(config: &LocatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds.into()))
            .user_agent(config.geocoding.user_agent.clone())
            .build()
            .map_err(|e| LocatorError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            search_url: format!("{}/search", config.geocoding.base_url.trim_end_matches('/')),
            country: config.geocoding.country.clone(),
        })
    }

    fn search_url(&self, postal_code: &PostalCode) -> Result<Url> {
        Url::parse_with_params(
            &self.search_url,
            [
                ("format", "json"),
                ("addressdetails", "1"),
                ("country", self.country.as_str()),
                ("postalcode", postal_code.as_str()),
            ],
        )
        .map_err(|e| LocatorError::config(format!("Invalid geocoding URL: {e}")))
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    #[instrument(name = "geocode", skip(self, postal_code), fields(postal_code = %postal_code))]
    async fn resolve_postal_code(&self, postal_code: &PostalCode) -> Result<Location> {
        let url = self.search_url(postal_code)?;
        debug!("Geocoding request URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("Geocoding request failed: {}", e);
                LocatorError::lookup_failure(LOOKUP_FAILED)
            })?;

        if !response.status().is_success() {
            error!("Geocoding service returned {}", response.status());
            return Err(LocatorError::lookup_failure(LOOKUP_FAILED));
        }

        let body: Value = response.json().await.map_err(|e| {
            error!("Failed to parse geocoding response: {}", e);
            LocatorError::lookup_failure(LOOKUP_FAILED)
        })?;

        let location = location_from_response(postal_code, body)?;
        info!(
            "Resolved {} to {} ({:.4}, {:.4}) in {:.3}s",
            postal_code,
            location.display_name,
            location.latitude,
            location.longitude,
            start_time.elapsed().as_secs_f64()
        );

        Ok(location)
    }
}
