//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! Entries, drafts and chart points serialize as-is; these types wrap them.

use serde::{Deserialize, Serialize};

use crate::storage::HealthEntry;
use crate::views::Stats;

/// Entry list response
#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    /// Number of entries
    pub total: usize,
    /// Entries, newest first
    pub entries: Vec<HealthEntry>,
}

/// Statistics cards
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Mean weight, null when nothing was weighed
    pub average_weight: Option<f64>,
    /// Display form of the mean weight ("71.0" or "-")
    pub average_weight_display: String,
    pub total_workouts: usize,
    pub average_steps: u64,
    pub entry_count: usize,
}

impl From<Stats> for StatsResponse {
    fn from(stats: Stats) -> Self {
        Self {
            average_weight_display: stats.average_weight_display(),
            average_weight: stats.average_weight,
            total_workouts: stats.total_workouts,
            average_steps: stats.average_steps,
            entry_count: stats.entry_count,
        }
    }
}

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// csv (default) or json
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    "csv".to_string()
}

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, unhealthy
    pub status: String,
    /// Storage status
    pub storage: String,
    /// Entries currently held
    pub entries: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
