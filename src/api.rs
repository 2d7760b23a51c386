//! JSON API over the search controller
//!
//! Each request renders into its own `SnapshotView`, so concurrent requests
//! never share view state. The response body is the rendered snapshot; a
//! map page can draw the markers and viewport from it directly.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::controller::{SearchController, SearchOutcome};
use crate::geocoding::Geocoder;
use crate::places::PlaceSearch;
use crate::view::{RenderSettings, SnapshotView};
use crate::{LocatorError, VERSION};

/// Shared clients and settings for every request
#[derive(Clone)]
pub struct AppState {
    pub geocoder: Arc<dyn Geocoder>,
    pub places: Arc<dyn PlaceSearch>,
    pub settings: RenderSettings,
    pub default_radius_miles: f64,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub zip: String,
    pub radius: Option<f64>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/health", get(health))
        .with_state(state)
}

fn status_for(outcome: &SearchOutcome) -> StatusCode {
    match outcome {
        SearchOutcome::Rendered { .. } => StatusCode::OK,
        SearchOutcome::Failed(LocatorError::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        SearchOutcome::Failed(LocatorError::NotFound { .. }) => StatusCode::NOT_FOUND,
        SearchOutcome::Failed(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
        SearchOutcome::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        // Unreachable: every request submits once to its own controller
        SearchOutcome::Superseded => StatusCode::CONFLICT,
    }
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> (StatusCode, Json<SnapshotView>) {
    let controller = SearchController::new(
        state.geocoder.clone(),
        state.places.clone(),
        SnapshotView::default(),
        state.settings,
    );

    let radius = params.radius.unwrap_or(state.default_radius_miles);
    let outcome = controller.submit(&params.zip, radius).await;

    (status_for(&outcome), Json(controller.into_view()))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": VERSION }))
}
