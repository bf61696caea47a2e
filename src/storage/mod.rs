//! Health Tracker Storage
//!
//! This module provides entry persistence:
//!
//! - **types**: Core data structures (HealthEntry)
//! - **kv**: Key-value backends (file-backed, in-memory)
//! - **store**: Date-ordered entry collection with write-through persistence
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   HealthEntry → EntryStore (sort, newest first) → JSON array → KeyValueStore[key]
//!
//! Read Path:
//!   KeyValueStore[key] → JSON array (malformed = empty) → EntryStore
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use health_tracker::storage::{EntryStore, FileStore, HealthEntry, DEFAULT_STORAGE_KEY};
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(FileStore::new("./health_data"));
//!     let mut store = EntryStore::load(backend, DEFAULT_STORAGE_KEY);
//!
//!     let id = store.next_id();
//!     let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     store.add(HealthEntry::new(id, date).weight(70.5).steps(9500))?;
//!
//!     println!("{} entries", store.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod kv;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use store::{EntryStore, DEFAULT_STORAGE_KEY};
pub use types::{HealthEntry, DATE_FORMAT};
