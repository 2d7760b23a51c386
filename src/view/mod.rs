//! Presentation surfaces for search results
//!
//! A search writes to three surfaces: a status line, a numbered results list
//! and a map with one marker per place. `ResultsView` is the seam between the
//! controller and whatever draws them:
//! - `TerminalView`: prints to a terminal for the command line
//! - `SnapshotView`: keeps the surfaces in memory, serializable as JSON

pub mod bounds;
pub mod render;
pub mod snapshot;
pub mod terminal;

use serde::{Deserialize, Serialize};

use crate::models::Coordinates;

pub use bounds::BoundingRegion;
pub use render::{RenderSettings, render_results};
pub use snapshot::SnapshotView;
pub use terminal::TerminalView;

/// Initial map view: center of the contiguous United States
pub const INITIAL_CENTER: Coordinates = Coordinates {
    latitude: 39.8283,
    longitude: -98.5795,
};
pub const INITIAL_ZOOM: u8 = 4;

pub const EMPTY_PLACEHOLDER: &str = "No pharmacies found in this area.";

/// Visual style of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLine {
    pub message: String,
    pub tone: StatusTone,
}

/// Map marker with the text of its popup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Coordinates,
    pub title: String,
    pub body: String,
}

/// One numbered row of the results list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub number: usize,
    pub name: String,
    pub address: String,
}

impl ListEntry {
    #[must_use]
    pub fn heading(&self) -> String {
        format!("{}. {}", self.number, self.name)
    }
}

/// What part of the map is visible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Viewport {
    Centered { center: Coordinates, zoom: u8 },
    Fitted { bounds: BoundingRegion, padding: u32 },
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::Centered {
            center: INITIAL_CENTER,
            zoom: INITIAL_ZOOM,
        }
    }
}

/// Surfaces a search renders into
pub trait ResultsView: Send {
    fn set_status(&mut self, message: &str, tone: StatusTone);

    /// Remove every marker and list entry, including the placeholder
    fn clear_results(&mut self);

    fn show_placeholder(&mut self, text: &str);

    fn add_marker(&mut self, marker: Marker);

    fn append_entry(&mut self, entry: ListEntry);

    fn set_view(&mut self, center: Coordinates, zoom: u8);

    fn fit_bounds(&mut self, bounds: BoundingRegion, padding: u32);
}
