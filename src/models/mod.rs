//! Data models for the pharmacy locator
//!
//! This module contains the core domain models organized by concern:
//! - Location: coordinates and the resolved search origin
//! - Place: points of interest returned by the nearby search
//! - Search: validated postal code and radius inputs

pub mod location;
pub mod place;
pub mod search;

// Re-export all public types for convenient access
pub use location::{Coordinates, Location};
pub use place::{Place, PlaceTags};
pub use search::{PostalCode, SearchRadius};
