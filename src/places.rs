//! Nearby place search against an Overpass API interpreter

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument};

use crate::config::LocatorConfig;
use crate::models::{Coordinates, Location, Place, PlaceTags, SearchRadius};
use crate::{LocatorError, Result};

pub const QUERY_FAILED: &str = "Failed to query pharmacies";

/// Finds points of interest around an origin
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn find_nearby(&self, origin: &Location, radius: SearchRadius) -> Result<Vec<Place>>;
}

/// Overpass interpreter response; `elements` may be missing entirely
#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Option<Vec<OverpassElement>>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(default)]
    lat: Option<Value>,
    #[serde(default)]
    lon: Option<Value>,
    #[serde(default)]
    center: Option<Value>,
    #[serde(default)]
    tags: Option<HashMap<String, Value>>,
}

/// Read a coordinate directly from the element, or from its `center` when
/// the direct field is absent. A present but non-numeric value is not
/// replaced by the center.
fn coordinate(direct: Option<&Value>, center: Option<&Value>, key: &str) -> Option<f64> {
    match direct {
        Some(value) if !value.is_null() => value.as_f64(),
        _ => center.and_then(|c| c.get(key)).and_then(Value::as_f64),
    }
}

/// String tag lookup, accepting the `addr:` prefixed key used by OSM
fn tag(tags: &HashMap<String, Value>, key: &str) -> Option<String> {
    [key.to_string(), format!("addr:{key}")]
        .iter()
        .filter_map(|k| tags.get(k))
        .find_map(|v| v.as_str().map(str::to_string))
}

impl From<OverpassElement> for Place {
    fn from(element: OverpassElement) -> Self {
        let center = element.center.as_ref();
        let latitude = coordinate(element.lat.as_ref(), center, "lat");
        let longitude = coordinate(element.lon.as_ref(), center, "lon");
        let position = match (latitude, longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        };

        let tags = element
            .tags
            .map(|tags| PlaceTags {
                name: tags.get("name").and_then(Value::as_str).map(str::to_string),
                housenumber: tag(&tags, "housenumber"),
                street: tag(&tags, "street"),
                city: tag(&tags, "city"),
            })
            .unwrap_or_default();

        Place::new(position, tags)
    }
}

/// Overpass API client
pub struct OverpassClient {
    client: Client,
    endpoint: String,
    amenity: String,
    query_timeout_seconds: u32,
}

impl OverpassClient {
    /// Create a new client from configuration
    pub fn new(config: &LocatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds.into()))
            .user_agent(config.geocoding.user_agent.clone())
            .build()
            .map_err(|e| LocatorError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.places.endpoint.clone(),
            amenity: config.places.amenity.clone(),
            query_timeout_seconds: config.places.query_timeout_seconds,
        })
    }

    /// Build the Overpass QL query for every node, way and relation with the
    /// configured amenity inside the radius. Non-point features report their
    /// center.
    #[must_use]
    pub fn build_query(&self, origin: &Location, radius: SearchRadius) -> String {
        format!(
            "[out:json][timeout:{}];nwr[\"amenity\"=\"{}\"](around:{},{},{});out center;",
            self.query_timeout_seconds,
            self.amenity,
            radius.meters(),
            origin.latitude,
            origin.longitude
        )
    }
}

/// Decode an interpreter response body into places
fn places_from_body(body: &[u8]) -> Result<Vec<Place>> {
    let response: OverpassResponse = serde_json::from_slice(body).map_err(|e| {
        error!("Failed to parse places response: {}", e);
        LocatorError::query_failure(QUERY_FAILED)
    })?;

    Ok(response
        .elements
        .unwrap_or_default()
        .into_iter()
        .map(Place::from)
        .collect())
}

#[async_trait]
impl PlaceSearch for OverpassClient {
    #[instrument(name = "find_nearby", skip(self, origin), fields(radius_miles = radius.miles()))]
    async fn find_nearby(&self, origin: &Location, radius: SearchRadius) -> Result<Vec<Place>> {
        let query = self.build_query(origin, radius);
        debug!("Places query: {}", query);
        let start_time = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(query)
            .send()
            .await
            .map_err(|e| {
                error!("Places request failed: {}", e);
                LocatorError::query_failure(QUERY_FAILED)
            })?;

        if !response.status().is_success() {
            error!("Places service returned {}", response.status());
            return Err(LocatorError::query_failure(QUERY_FAILED));
        }

        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read places response: {}", e);
            LocatorError::query_failure(QUERY_FAILED)
        })?;

        let places = places_from_body(&body)?;
        info!(
            "Found {} places in {:.3}s",
            places.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(places)
    }
}
