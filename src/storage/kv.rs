//! Key-value backends
//!
//! The entry store persists its whole collection under a single key. Backends
//! only deal in opaque string values; encoding is the store's concern.
//!
//! - `FileStore`: one file per key under a data directory (`<key>.json`)
//! - `MemoryStore`: process-local map, used by tests and ephemeral sessions

use crate::storage::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Local persistent key-value storage
///
/// Writes are synchronous: when `set` returns `Ok`, the value is what the
/// next `get` for that key observes. Implementations block the calling
/// thread; the API server calls them while holding the session lock, which
/// serializes access for a single local user.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if the key was never written
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// File-backed store: each key lives in `<data_dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Root directory holding the key files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the file path backing `key`
    pub fn key_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.data_dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, value)?;
        tracing::debug!(path = ?path, bytes = value.len(), "Wrote key file");
        Ok(())
    }
}

/// In-memory store, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keys become file names, so they must not escape the data directory
fn validate_key(key: &str) -> StorageResult<()> {
    let invalid = key.is_empty()
        || key.starts_with('.')
        || key.contains(&['/', '\\'][..])
        || key.chars().any(char::is_control);

    if invalid {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
