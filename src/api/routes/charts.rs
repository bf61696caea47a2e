//! Chart and Statistics Routes
//!
//! - GET /api/v1/charts/weight - Weight series, oldest first
//! - GET /api/v1/charts/activity - Steps/duration series, oldest first
//! - GET /api/v1/stats - Statistics cards

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::StatsResponse;
use crate::api::state::AppState;
use crate::views::{ActivityPoint, WeightPoint};

/// GET /api/v1/charts/weight
pub async fn weight_chart(State(state): State<Arc<AppState>>) -> Json<Vec<WeightPoint>> {
    Json(state.tracker.read().await.weight_series())
}

/// GET /api/v1/charts/activity
pub async fn activity_chart(State(state): State<Arc<AppState>>) -> Json<Vec<ActivityPoint>> {
    Json(state.tracker.read().await.activity_series())
}

/// GET /api/v1/stats
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(state.tracker.read().await.stats().into())
}
