//! Export Routes
//!
//! Data export endpoint for backup and analysis.
//!
//! - GET /api/v1/export?format=csv|json - Download all entries

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::ExportParams;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::export::{export_entries, ExportFormat};

/// GET /api/v1/export
pub async fn export_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
) -> ApiResult<Response> {
    let format: ExportFormat = params.format.parse().map_err(ApiError::Validation)?;

    let body = {
        let tracker = state.tracker.read().await;
        export_entries(tracker.entries(), format)?
    };

    let filename = format!(
        "health_export_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        Body::from(body),
    )
        .into_response())
}
