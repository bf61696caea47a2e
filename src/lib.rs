//! # Health Tracker
//!
//! Personal health tracking: record daily weight, calories, steps and
//! workouts, keep a running list of entries, and chart weight and activity
//! trends. All state lives in a local key-value store.
//!
//! ## Modules
//!
//! - [`storage`]: Entry model, key-value backends and the entry store
//! - [`form`]: Raw-text entry drafts and their coercion into entries
//! - [`views`]: Chart series and aggregate statistics
//! - [`tracker`]: Session tying store, draft and display mode together
//! - [`render`]: Terminal rendering of the display modes
//! - [`export`]: CSV / JSON export
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use health_tracker::storage::{FileStore, DEFAULT_STORAGE_KEY};
//! use health_tracker::tracker::Tracker;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(FileStore::new("./health_data"));
//!     let mut tracker = Tracker::open(backend, DEFAULT_STORAGE_KEY);
//!
//!     let draft = tracker.draft_mut();
//!     draft.weight = "70.5".to_string();
//!     draft.steps = "9500".to_string();
//!     tracker.save_entry()?;
//!
//!     let stats = tracker.stats();
//!     println!("Average weight: {} kg", stats.average_weight_display());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod export;
pub mod form;
pub mod logging;
pub mod render;
pub mod storage;
pub mod tracker;
pub mod views;

// Re-export top-level types for convenience
pub use storage::{
    EntryStore, FileStore, HealthEntry, KeyValueStore, MemoryStore, StorageError, StorageResult,
    DEFAULT_STORAGE_KEY,
};

pub use form::{EntryDraft, FormError};

pub use views::{ActivityPoint, Stats, WeightPoint};

pub use tracker::{Tracker, TrackerError, View};

pub use export::ExportFormat;

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, StorageConfig};
