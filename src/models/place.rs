//! Place model for points of interest returned by the nearby search

use serde::{Deserialize, Serialize};

use super::Coordinates;

pub const UNNAMED_PLACE: &str = "Unnamed pharmacy";
pub const ADDRESS_NOT_AVAILABLE: &str = "Address not available";

/// Descriptive tags attached to a place
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PlaceTags {
    pub name: Option<String>,
    pub housenumber: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
}

/// A point of interest found near the search origin.
///
/// `position` is `None` when the source element carried no usable numeric
/// coordinates; such places are kept in the result sequence but never drawn.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    pub position: Option<Coordinates>,
    pub tags: PlaceTags,
}

impl Place {
    #[must_use]
    pub fn new(position: Option<Coordinates>, tags: PlaceTags) -> Self {
        Self { position, tags }
    }

    /// Name to display, falling back to a generic label when missing or empty
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.tags.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNNAMED_PLACE,
        }
    }

    /// Composed street address, or `None` when every component is missing
    #[must_use]
    pub fn composed_address(&self) -> Option<String> {
        let address = [&self.tags.housenumber, &self.tags.street, &self.tags.city]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        (!address.is_empty()).then_some(address)
    }

    /// Address to display, falling back to a placeholder
    #[must_use]
    pub fn display_address(&self) -> String {
        self.composed_address()
            .unwrap_or_else(|| ADDRESS_NOT_AVAILABLE.to_string())
    }
}
