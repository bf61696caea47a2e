//! Health Tracker REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! ## Entries
//! - `GET /api/v1/entries` - List entries, newest first
//! - `POST /api/v1/entries` - Save a draft as a new entry
//! - `GET /api/v1/entries/:id` - Get an entry
//! - `DELETE /api/v1/entries/:id` - Delete an entry
//!
//! ## Charts
//! - `GET /api/v1/charts/weight` - Weight series
//! - `GET /api/v1/charts/activity` - Steps and duration series
//! - `GET /api/v1/stats` - Aggregate statistics
//!
//! ## Export
//! - `GET /api/v1/export` - Download entries as CSV or JSON
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use health_tracker::api::{serve, AppState};
//! use health_tracker::config::ApiConfig;
//! use health_tracker::storage::{FileStore, DEFAULT_STORAGE_KEY};
//! use health_tracker::tracker::Tracker;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(FileStore::new("./health_data"));
//!     let tracker = Tracker::open(backend, DEFAULT_STORAGE_KEY);
//!     let config = ApiConfig::default();
//!
//!     serve(AppState::new(tracker, config.clone()), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let api_routes = Router::new()
        .route(
            "/entries",
            get(routes::entries::list_entries).post(routes::entries::create_entry),
        )
        .route(
            "/entries/:id",
            get(routes::entries::get_entry).delete(routes::entries::delete_entry),
        )
        .route("/charts/weight", get(routes::charts::weight_chart))
        .route("/charts/activity", get(routes::charts::activity_chart))
        .route("/stats", get(routes::charts::stats))
        .route("/export", get(routes::export::export_data));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Any origin when none are configured, otherwise only the listed ones
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Health Tracker API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Health Tracker API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, DEFAULT_STORAGE_KEY};
    use crate::tracker::Tracker;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> (Router, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        let tracker = Tracker::open(backend.clone(), DEFAULT_STORAGE_KEY);
        let state = AppState::new(tracker, ApiConfig::default());

        (build_router(state), backend)
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_entry(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/entries")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (app, _backend) = create_test_app();

        for uri in ["/health/live", "/health/ready", "/health"] {
            let response = send(&app, get_request(uri)).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_list_entries_empty() {
        let (app, _backend) = create_test_app();

        let response = send(&app, get_request("/api/v1/entries")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["total"], 0);
        assert_eq!(body["entries"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_entry_coerces_draft() {
        let (app, backend) = create_test_app();

        let response = send(
            &app,
            post_entry(r#"{"date":"2024-01-01","weight":"70.5","steps":"","calories":"abc","exercise":"Running"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        assert_eq!(body["date"], "2024-01-01");
        assert_eq!(body["weight"], 70.5);
        assert_eq!(body["exercise"], "Running");
        assert!(body.get("steps").is_none());
        assert!(body.get("calories").is_none());

        // Written through to the backend
        let raw = backend.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"weight\":70.5"));
    }

    #[tokio::test]
    async fn test_create_entry_from_numeric_draft() {
        let (app, _backend) = create_test_app();

        let response = send(
            &app,
            post_entry(r#"{"date":"2024-01-01","weight":70.5,"steps":-5,"calories":1800}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        assert_eq!(body["weight"], 70.5);
        assert_eq!(body["calories"], 1800);
        assert!(body.get("steps").is_none());
    }

    #[tokio::test]
    async fn test_create_entry_invalid_date() {
        let (app, _backend) = create_test_app();

        let response = send(&app, post_entry(r#"{"date":"2024-13-45"}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INVALID_FORM");
    }

    #[tokio::test]
    async fn test_create_entry_invalid_json() {
        let (app, _backend) = create_test_app();

        let response = send(&app, post_entry("not json")).await;
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_get_and_delete_entry() {
        let (app, _backend) = create_test_app();

        let created = json_body(send(&app, post_entry(r#"{"date":"2024-01-01"}"#)).await).await;
        let id = created["id"].as_str().unwrap().to_string();
        let uri = format!("/api/v1/entries/{}", id);

        let response = send(&app, get_request(&uri)).await;
        assert_eq!(response.status(), StatusCode::OK);

        for _ in 0..2 {
            let response = send(
                &app,
                Request::builder()
                    .method("DELETE")
                    .uri(&uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
        }

        let response = send(&app, get_request(&uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_charts_and_stats() {
        let (app, _backend) = create_test_app();

        send(&app, post_entry(r#"{"date":"2024-01-01","weight":"70","steps":"10000"}"#)).await;
        send(&app, post_entry(r#"{"date":"2024-01-03","weight":"72","duration":"30","exercise":"Gym"}"#)).await;

        let list = json_body(send(&app, get_request("/api/v1/entries")).await).await;
        assert_eq!(list["entries"][0]["date"], "2024-01-03");
        assert_eq!(list["entries"][1]["date"], "2024-01-01");

        let weight = json_body(send(&app, get_request("/api/v1/charts/weight")).await).await;
        assert_eq!(
            weight,
            serde_json::json!([
                {"label": "Jan 01", "value": 70.0},
                {"label": "Jan 03", "value": 72.0}
            ])
        );

        let activity = json_body(send(&app, get_request("/api/v1/charts/activity")).await).await;
        assert_eq!(
            activity,
            serde_json::json!([
                {"label": "Jan 01", "steps": 10000, "duration": 0},
                {"label": "Jan 03", "steps": 0, "duration": 30}
            ])
        );

        let stats = json_body(send(&app, get_request("/api/v1/stats")).await).await;
        assert_eq!(stats["average_weight"], 71.0);
        assert_eq!(stats["average_weight_display"], "71.0");
        assert_eq!(stats["total_workouts"], 1);
        assert_eq!(stats["average_steps"], 10000);
    }

    #[tokio::test]
    async fn test_export_csv() {
        let (app, _backend) = create_test_app();
        send(&app, post_entry(r#"{"date":"2024-01-01","steps":"500"}"#)).await;

        let response = send(&app, get_request("/api/v1/export?format=csv")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/csv");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("id,date,weight"));
        assert!(text.contains(",2024-01-01,,,500,,,"));
    }

    #[tokio::test]
    async fn test_export_unknown_format() {
        let (app, _backend) = create_test_app();

        let response = send(&app, get_request("/api/v1/export?format=xml")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
