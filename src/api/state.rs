//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::config::ApiConfig;
use crate::tracker::Tracker;

/// Shared application state for all handlers
pub struct AppState {
    /// The tracker session; one lock serializes every store mutation
    pub tracker: RwLock<Tracker>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(tracker: Tracker, config: ApiConfig) -> Self {
        Self {
            tracker: RwLock::new(tracker),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
