use tracing::debug;

use super::{BoundingRegion, EMPTY_PLACEHOLDER, ListEntry, Marker, ResultsView};
use crate::config::MapConfig;
use crate::models::{Location, Place};

/// Map parameters for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Zoom used when centering on the origin with nothing to show
    pub empty_zoom: u8,
    /// Padding on each side when fitting the result bounds
    pub fit_padding: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from(&MapConfig::default())
    }
}

impl From<&MapConfig> for RenderSettings {
    fn from(config: &MapConfig) -> Self {
        Self {
            empty_zoom: config.empty_zoom,
            fit_padding: config.fit_padding,
        }
    }
}

/// Replace the list and markers with `places` around `origin`.
///
/// Places without a usable position are skipped, but entries keep the
/// number of their place in `places`. Returns how many places were drawn.
pub fn render_results<V: ResultsView + ?Sized>(
    view: &mut V,
    places: &[Place],
    origin: &Location,
    settings: RenderSettings,
) -> usize {
    view.clear_results();

    let mut bounds = BoundingRegion::around(origin.coordinates());

    if places.is_empty() {
        view.show_placeholder(EMPTY_PLACEHOLDER);
        view.set_view(origin.coordinates(), settings.empty_zoom);
        return 0;
    }

    let mut shown = 0;
    for (index, place) in places.iter().enumerate() {
        let Some(position) = place.position else {
            continue;
        };

        let name = place.display_name().to_string();
        let address = place.display_address();
        shown += 1;

        view.add_marker(Marker {
            position,
            title: name.clone(),
            body: address.clone(),
        });
        bounds.extend(position);
        view.append_entry(ListEntry {
            number: index + 1,
            name,
            address,
        });
    }

    debug!("Rendered {} of {} places", shown, places.len());
    view.fit_bounds(bounds, settings.fit_padding);
    shown
}
