//! Entry Routes
//!
//! - GET /api/v1/entries - List entries, newest first
//! - POST /api/v1/entries - Save a draft as a new entry
//! - GET /api/v1/entries/:id - Get one entry
//! - DELETE /api/v1/entries/:id - Delete an entry (no-op when absent)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::EntryListResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::form::EntryDraft;
use crate::storage::HealthEntry;

/// GET /api/v1/entries
pub async fn list_entries(State(state): State<Arc<AppState>>) -> Json<EntryListResponse> {
    let tracker = state.tracker.read().await;
    let entries = tracker.entries().to_vec();

    Json(EntryListResponse {
        total: entries.len(),
        entries,
    })
}

/// GET /api/v1/entries/:id
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<HealthEntry>> {
    let tracker = state.tracker.read().await;

    tracker
        .store()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Entry with id {} not found", id)))
}

/// POST /api/v1/entries
///
/// The body is a draft: every field is raw text and may be omitted. Numbers
/// that do not parse are stored as absent; only a bad date is rejected.
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<EntryDraft>,
) -> ApiResult<(StatusCode, Json<HealthEntry>)> {
    let entry = state.tracker.write().await.submit(&draft)?;

    tracing::info!(entry_id = %entry.id, date = %entry.date, "Created entry");

    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/v1/entries/:id
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let removed = state.tracker.write().await.delete_entry(&id)?;

    tracing::debug!(entry_id = %id, removed, "Delete entry");

    Ok(StatusCode::NO_CONTENT)
}
