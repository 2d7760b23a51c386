//! In-memory view whose state can be inspected or sent as JSON

use serde::{Deserialize, Serialize};

use super::{BoundingRegion, ListEntry, Marker, ResultsView, StatusLine, StatusTone, Viewport};
use crate::models::Coordinates;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotView {
    pub status: Option<StatusLine>,
    pub placeholder: Option<String>,
    pub entries: Vec<ListEntry>,
    pub markers: Vec<Marker>,
    pub viewport: Viewport,
    /// Every status message in the order it was shown
    #[serde(skip)]
    pub status_history: Vec<StatusLine>,
}

impl SnapshotView {
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.message.as_str())
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(|s| s.tone == StatusTone::Error)
    }
}

impl ResultsView for SnapshotView {
    fn set_status(&mut self, message: &str, tone: StatusTone) {
        let line = StatusLine {
            message: message.to_string(),
            tone,
        };
        self.status_history.push(line.clone());
        self.status = Some(line);
    }

    fn clear_results(&mut self) {
        self.placeholder = None;
        self.entries.clear();
        self.markers.clear();
    }

    fn show_placeholder(&mut self, text: &str) {
        self.placeholder = Some(text.to_string());
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn append_entry(&mut self, entry: ListEntry) {
        self.entries.push(entry);
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        self.viewport = Viewport::Centered { center, zoom };
    }

    fn fit_bounds(&mut self, bounds: BoundingRegion, padding: u32) {
        self.viewport = Viewport::Fitted { bounds, padding };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{INITIAL_CENTER, INITIAL_ZOOM};

    #[test]
    fn test_starts_on_initial_view() {
        let view = SnapshotView::default();
        assert_eq!(
            view.viewport,
            Viewport::Centered {
                center: INITIAL_CENTER,
                zoom: INITIAL_ZOOM
            }
        );
        assert!(view.status.is_none());
    }

    #[test]
    fn test_status_history_and_tone() {
        let mut view = SnapshotView::default();
        view.set_status("Looking up ZIP code...", StatusTone::Info);
        view.set_status("ZIP code not found", StatusTone::Error);

        assert_eq!(view.status_message(), Some("ZIP code not found"));
        assert!(view.is_error());
        assert_eq!(view.status_history.len(), 2);
    }

    #[test]
    fn test_json_shape() {
        let mut view = SnapshotView::default();
        view.set_status("Showing results within 5 miles of 90210.", StatusTone::Info);
        view.fit_bounds(
            BoundingRegion::around(Coordinates::new(34.0, -118.0)),
            30,
        );

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"]["tone"], "info");
        assert_eq!(json["viewport"]["mode"], "fitted");
        assert_eq!(json["viewport"]["padding"], 30);
        assert!(json.get("status_history").is_none());
    }
}
