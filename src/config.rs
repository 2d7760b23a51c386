//! Configuration management for the pharmacy locator
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::LocatorError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Postal code geocoding service
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Nearby places service
    #[serde(default)]
    pub places: PlacesConfig,
    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default search settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Map presentation settings
    #[serde(default)]
    pub map: MapConfig,
    /// HTTP API settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Nominatim settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL; `/search` is appended
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Client identification sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Country the postal code is resolved in
    #[serde(default = "default_country")]
    pub country: String,
}

/// Overpass settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Interpreter endpoint the query is POSTed to
    #[serde(default = "default_places_endpoint")]
    pub endpoint: String,
    /// Value of the `amenity` tag to search for
    #[serde(default = "default_amenity")]
    pub amenity: String,
    /// Server-side query timeout in seconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Search radius in miles when none is given
    #[serde(default = "default_radius_miles")]
    pub radius_miles: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Zoom level used to center on the origin when nothing was found
    #[serde(default = "default_empty_zoom")]
    pub empty_zoom: u8,
    /// Padding applied on each side when fitting the result bounds
    #[serde(default = "default_fit_padding")]
    pub fit_padding: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    "Pharmacy-Locator-Demo".to_string()
}

fn default_country() -> String {
    "USA".to_string()
}

fn default_places_endpoint() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_amenity() -> String {
    "pharmacy".to_string()
}

fn default_query_timeout() -> u32 {
    25
}

fn default_http_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_radius_miles() -> f64 {
    5.0
}

fn default_empty_zoom() -> u8 {
    12
}

fn default_fit_padding() -> u32 {
    30
}

fn default_port() -> u16 {
    3000
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            user_agent: default_user_agent(),
            country: default_country(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_places_endpoint(),
            amenity: default_amenity(),
            query_timeout_seconds: default_query_timeout(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_http_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            radius_miles: default_radius_miles(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            empty_zoom: default_empty_zoom(),
            fit_padding: default_fit_padding(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            geocoding: GeocodingConfig::default(),
            places: PlacesConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
            defaults: DefaultsConfig::default(),
            map: MapConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl LocatorConfig {
    /// Load configuration from the default file location and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // PHARMACY_LOCATOR_GEOCODING__BASE_URL style overrides
        builder = builder.add_source(
            Environment::with_prefix("PHARMACY_LOCATOR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: LocatorConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pharmacy-locator").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_user_agent();
        }
        if self.geocoding.country.is_empty() {
            self.geocoding.country = default_country();
        }
        if self.places.endpoint.is_empty() {
            self.places.endpoint = default_places_endpoint();
        }
        if self.places.amenity.is_empty() {
            self.places.amenity = default_amenity();
        }
        if self.places.query_timeout_seconds == 0 {
            self.places.query_timeout_seconds = default_query_timeout();
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_http_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.map.empty_zoom == 0 {
            self.map.empty_zoom = default_empty_zoom();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds > 300 {
            return Err(LocatorError::config("HTTP timeout cannot exceed 300 seconds").into());
        }

        if self.places.query_timeout_seconds > 180 {
            return Err(LocatorError::config(
                "Places query timeout cannot exceed 180 seconds",
            )
            .into());
        }

        if !self.defaults.radius_miles.is_finite()
            || self.defaults.radius_miles <= 0.0
            || self.defaults.radius_miles > 100.0
        {
            return Err(LocatorError::config(
                "Default radius must be greater than 0 and at most 100 miles",
            )
            .into());
        }

        if self.map.empty_zoom > 19 {
            return Err(LocatorError::config("Map zoom cannot exceed 19").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(LocatorError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(LocatorError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoding base URL", &self.geocoding.base_url),
            ("Places endpoint", &self.places.endpoint),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(LocatorError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = LocatorConfig::default();
        assert_eq!(config.geocoding.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.geocoding.user_agent, "Pharmacy-Locator-Demo");
        assert_eq!(config.geocoding.country, "USA");
        assert_eq!(config.places.endpoint, "https://overpass-api.de/api/interpreter");
        assert_eq!(config.places.amenity, "pharmacy");
        assert_eq!(config.places.query_timeout_seconds, 25);
        assert_eq!(config.map.empty_zoom, 12);
        assert_eq!(config.map.fit_padding, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = LocatorConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = LocatorConfig::default();
        config.http.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = LocatorConfig::default();
        config.places.endpoint = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Places endpoint"));
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = LocatorConfig::default();
        config.geocoding.user_agent.clear();
        config.places.query_timeout_seconds = 0;
        config.apply_defaults();
        assert_eq!(config.geocoding.user_agent, "Pharmacy-Locator-Demo");
        assert_eq!(config.places.query_timeout_seconds, 25);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "pharmacy-locator-config-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[geocoding]\nbase_url = \"http://127.0.0.1:9000\"\n\n[defaults]\nradius_miles = 10.0"
        )
        .unwrap();

        let config = LocatorConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.geocoding.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.defaults.radius_miles, 10.0);
        assert_eq!(config.places.amenity, "pharmacy");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = LocatorConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("pharmacy-locator"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
