//! Search orchestration
//!
//! `SearchController` owns the view and runs one search per submission:
//! validate the input, resolve the postal code, look up nearby places and
//! render them. Every submission takes a new generation number. A search
//! that finds a newer generation after one of its awaits stops without
//! touching the view again, so the latest submission always wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

use crate::LocatorError;
use crate::geocoding::Geocoder;
use crate::models::{Location, PostalCode, SearchRadius};
use crate::places::PlaceSearch;
use crate::view::{RenderSettings, ResultsView, StatusTone, render_results};

pub const LOOKING_UP: &str = "Looking up ZIP code...";

/// Where a search currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Validating,
    ResolvingLocation,
    QueryingPlaces,
    Rendered,
    Failed,
}

/// How a submission ended
#[derive(Debug)]
pub enum SearchOutcome {
    Rendered {
        location: Location,
        /// Places returned by the service
        found: usize,
        /// Places drawn on the map
        shown: usize,
    },
    Failed(LocatorError),
    /// A newer submission started before this one finished
    Superseded,
}

impl SearchOutcome {
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self, SearchOutcome::Rendered { .. })
    }
}

struct ControllerState<V> {
    view: V,
    phase: SearchPhase,
}

pub struct SearchController<V: ResultsView> {
    geocoder: Arc<dyn Geocoder>,
    places: Arc<dyn PlaceSearch>,
    settings: RenderSettings,
    state: Mutex<ControllerState<V>>,
    generation: AtomicU64,
}

fn searching_message(location: &Location) -> String {
    format!(
        "Found {}. Searching for pharmacies...",
        location.display_name
    )
}

fn showing_message(radius: SearchRadius, postal_code: &PostalCode) -> String {
    format!("Showing results within {radius} miles of {postal_code}.")
}

impl<V: ResultsView> SearchController<V> {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        places: Arc<dyn PlaceSearch>,
        view: V,
        settings: RenderSettings,
    ) -> Self {
        Self {
            geocoder,
            places,
            settings,
            state: Mutex::new(ControllerState {
                view,
                phase: SearchPhase::Idle,
            }),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn phase(&self) -> SearchPhase {
        self.state.lock().await.phase
    }

    /// Read the view without changing it
    pub async fn inspect<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.state.lock().await.view)
    }

    pub fn into_view(self) -> V {
        self.state.into_inner().view
    }

    /// Apply `f` only if `token` is still the latest submission
    async fn update(&self, token: u64, f: impl FnOnce(&mut ControllerState<V>)) -> bool {
        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) != token {
            debug!("Search {} superseded, dropping update", token);
            return false;
        }
        f(&mut state);
        true
    }

    async fn fail(&self, token: u64, err: LocatorError) -> SearchOutcome {
        error!("Search {} failed: {}", token, err);
        let message = err.user_message();
        let current = self
            .update(token, |state| {
                state.phase = SearchPhase::Failed;
                state.view.set_status(&message, StatusTone::Error);
            })
            .await;

        if current {
            SearchOutcome::Failed(err)
        } else {
            SearchOutcome::Superseded
        }
    }

    /// Run one search for a raw postal code and a radius in miles
    #[instrument(name = "search", skip(self))]
    pub async fn submit(&self, postal_code: &str, radius_miles: f64) -> SearchOutcome {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.update(token, |state| state.phase = SearchPhase::Validating)
            .await;

        let input = PostalCode::parse(postal_code)
            .and_then(|code| SearchRadius::from_miles(radius_miles).map(|r| (code, r)));
        let (postal_code, radius) = match input {
            Ok(input) => input,
            Err(e) => return self.fail(token, e).await,
        };

        let current = self
            .update(token, |state| {
                state.phase = SearchPhase::ResolvingLocation;
                state.view.set_status(LOOKING_UP, StatusTone::Info);
            })
            .await;
        if !current {
            return SearchOutcome::Superseded;
        }

        let location = match self.geocoder.resolve_postal_code(&postal_code).await {
            Ok(location) => location,
            Err(e) => return self.fail(token, e).await,
        };

        let current = self
            .update(token, |state| {
                state.phase = SearchPhase::QueryingPlaces;
                state
                    .view
                    .set_status(&searching_message(&location), StatusTone::Info);
            })
            .await;
        if !current {
            return SearchOutcome::Superseded;
        }

        let places = match self.places.find_nearby(&location, radius).await {
            Ok(places) => places,
            Err(e) => return self.fail(token, e).await,
        };

        let mut shown = 0;
        let current = self
            .update(token, |state| {
                state
                    .view
                    .set_status(&showing_message(radius, &postal_code), StatusTone::Info);
                shown = render_results(&mut state.view, &places, &location, self.settings);
                state.phase = SearchPhase::Rendered;
            })
            .await;
        if !current {
            return SearchOutcome::Superseded;
        }

        info!(
            "Showing {} of {} places within {} miles of {}",
            shown,
            places.len(),
            radius,
            postal_code
        );
        SearchOutcome::Rendered {
            location,
            found: places.len(),
            shown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, Place, PlaceTags};
    use crate::view::{SnapshotView, Viewport};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeGeocoder {
        calls: AtomicUsize,
        empty: bool,
        broken: bool,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn resolve_postal_code(&self, postal_code: &PostalCode) -> crate::Result<Location> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(LocatorError::lookup_failure("Failed to lookup ZIP code"));
            }
            if self.empty {
                return Err(LocatorError::not_found("ZIP code not found"));
            }
            // "11111" answers slowly so a second search can overtake it
            if postal_code.as_str() == "11111" {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            Ok(Location::new(34.09, -118.41, format!("Place {postal_code}")))
        }
    }

    #[derive(Default)]
    struct FakePlaces {
        calls: AtomicUsize,
        places: Vec<Place>,
        broken: bool,
    }

    #[async_trait]
    impl PlaceSearch for FakePlaces {
        async fn find_nearby(
            &self,
            _origin: &Location,
            _radius: SearchRadius,
        ) -> crate::Result<Vec<Place>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(LocatorError::query_failure("Failed to query pharmacies"));
            }
            Ok(self.places.clone())
        }
    }

    fn pharmacy(name: &str, lat: f64, lon: f64) -> Place {
        Place::new(
            Some(Coordinates::new(lat, lon)),
            PlaceTags {
                name: Some(name.to_string()),
                ..PlaceTags::default()
            },
        )
    }

    fn controller(
        geocoder: Arc<FakeGeocoder>,
        places: Arc<FakePlaces>,
    ) -> SearchController<SnapshotView> {
        SearchController::new(
            geocoder,
            places,
            SnapshotView::default(),
            RenderSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_invalid_postal_code_makes_no_calls() {
        let geocoder = Arc::new(FakeGeocoder::default());
        let places = Arc::new(FakePlaces::default());
        let controller = controller(geocoder.clone(), places.clone());

        let outcome = controller.submit("9021", 5.0).await;

        assert!(matches!(outcome, SearchOutcome::Failed(LocatorError::Validation { .. })));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(places.calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.phase().await, SearchPhase::Failed);
        controller
            .inspect(|view| {
                assert_eq!(
                    view.status_message(),
                    Some("Please enter a valid 5-digit ZIP code.")
                );
                assert!(view.is_error());
            })
            .await;
    }

    #[tokio::test]
    async fn test_not_found_skips_places_query() {
        let geocoder = Arc::new(FakeGeocoder {
            empty: true,
            ..FakeGeocoder::default()
        });
        let places = Arc::new(FakePlaces::default());
        let controller = controller(geocoder.clone(), places.clone());

        let outcome = controller.submit("00000", 5.0).await;

        assert!(matches!(outcome, SearchOutcome::Failed(LocatorError::NotFound { .. })));
        assert_eq!(places.calls.load(Ordering::SeqCst), 0);
        let view = controller.into_view();
        assert_eq!(view.status_message(), Some("ZIP code not found"));
        assert!(view.is_error());
    }

    #[tokio::test]
    async fn test_query_failure_is_reported() {
        let geocoder = Arc::new(FakeGeocoder::default());
        let places = Arc::new(FakePlaces {
            broken: true,
            ..FakePlaces::default()
        });
        let controller = controller(geocoder, places);

        let outcome = controller.submit("90210", 5.0).await;

        assert!(matches!(outcome, SearchOutcome::Failed(LocatorError::QueryFailure { .. })));
        let view = controller.into_view();
        assert_eq!(view.status_message(), Some("Failed to query pharmacies"));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_reported() {
        let geocoder = Arc::new(FakeGeocoder {
            broken: true,
            ..FakeGeocoder::default()
        });
        let controller = controller(geocoder, Arc::new(FakePlaces::default()));

        let outcome = controller.submit("90210", 5.0).await;

        assert!(matches!(outcome, SearchOutcome::Failed(LocatorError::LookupFailure { .. })));
        assert_eq!(controller.phase().await, SearchPhase::Failed);
    }

    #[tokio::test]
    async fn test_status_transitions_on_success() {
        let places = Arc::new(FakePlaces {
            places: vec![pharmacy("A", 34.07, -118.40), pharmacy("B", 34.10, -118.38)],
            ..FakePlaces::default()
        });
        let controller = controller(Arc::new(FakeGeocoder::default()), places);

        let outcome = controller.submit(" 90210 ", 5.0).await;

        let SearchOutcome::Rendered { found, shown, .. } = outcome else {
            panic!("expected rendered outcome, got {outcome:?}");
        };
        assert_eq!((found, shown), (2, 2));
        assert_eq!(controller.phase().await, SearchPhase::Rendered);

        let view = controller.into_view();
        let history: Vec<&str> = view
            .status_history
            .iter()
            .map(|s| s.message.as_str())
            .collect();
        assert_eq!(
            history,
            vec![
                "Looking up ZIP code...",
                "Found Place 90210. Searching for pharmacies...",
                "Showing results within 5 miles of 90210.",
            ]
        );
        assert!(!view.is_error());
        assert_eq!(view.entries.len(), 2);
        assert!(matches!(view.viewport, Viewport::Fitted { .. }));
    }

    #[tokio::test]
    async fn test_failure_then_success_recovers() {
        let places = Arc::new(FakePlaces {
            places: vec![pharmacy("A", 34.07, -118.40)],
            ..FakePlaces::default()
        });
        let controller = controller(Arc::new(FakeGeocoder::default()), places);

        assert!(!controller.submit("abc", 5.0).await.is_rendered());
        assert!(controller.submit("90210", 5.0).await.is_rendered());

        let view = controller.into_view();
        assert!(!view.is_error());
        assert_eq!(view.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_radius_is_rejected() {
        let geocoder = Arc::new(FakeGeocoder::default());
        let controller = controller(geocoder.clone(), Arc::new(FakePlaces::default()));

        let outcome = controller.submit("90210", 0.0).await;

        assert!(matches!(outcome, SearchOutcome::Failed(LocatorError::Validation { .. })));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_newer_search_supersedes_slow_one() {
        let places = Arc::new(FakePlaces {
            places: vec![pharmacy("A", 34.07, -118.40)],
            ..FakePlaces::default()
        });
        let controller = controller(Arc::new(FakeGeocoder::default()), places);

        let (slow, fast) = tokio::join!(
            controller.submit("11111", 5.0),
            controller.submit("22222", 10.0)
        );

        assert!(matches!(slow, SearchOutcome::Superseded));
        assert!(fast.is_rendered());

        let view = controller.into_view();
        assert_eq!(
            view.status_message(),
            Some("Showing results within 10 miles of 22222.")
        );
        assert!(
            view.status_history
                .iter()
                .all(|s| !s.message.contains("11111"))
        );
    }
}
