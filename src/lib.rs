//! `pharmacy-locator` - find pharmacies near a US ZIP code
//!
//! Resolves a postal code with Nominatim, searches OpenStreetMap data for
//! pharmacies through the Overpass API and renders the results as a
//! numbered list and a set of map markers.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod geocoding;
pub mod logging;
pub mod models;
pub mod places;
pub mod view;
pub mod web;

// Re-export core types for public API
pub use crate::config::LocatorConfig;
pub use controller::{SearchController, SearchOutcome, SearchPhase};
pub use error::LocatorError;
pub use geocoding::{Geocoder, NominatimClient};
pub use models::{Coordinates, Location, Place, PlaceTags, PostalCode, SearchRadius};
pub use places::{OverpassClient, PlaceSearch};
pub use view::{ResultsView, SnapshotView, TerminalView};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, LocatorError>;
