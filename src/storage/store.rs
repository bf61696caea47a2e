//! Entry Store
//!
//! Holds the collection of health entries and writes it through to a single
//! key of a [`KeyValueStore`] on every mutation.
//!
//! The collection is always ordered by date, newest first. Entries sharing a
//! date keep their insertion order.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::kv::KeyValueStore;
use crate::storage::types::HealthEntry;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

/// Default key the collection is persisted under
pub const DEFAULT_STORAGE_KEY: &str = "healthEntries";

/// The persisted, date-ordered collection of health entries
pub struct EntryStore {
    /// Persistent backend
    backend: Arc<dyn KeyValueStore>,
    /// Key holding the JSON-encoded collection
    key: String,
    /// Entries, sorted by date descending
    entries: Vec<HealthEntry>,
    /// Last timestamp handed out by `next_id`
    last_issued_id: i64,
}

impl EntryStore {
    /// Restore the collection stored under `key`.
    ///
    /// A missing key yields an empty store. Data that is unreadable, not JSON
    /// or not an array is logged and also yields an empty store; the next
    /// mutation overwrites it. Inside an array, elements are decoded one by
    /// one and only those without a usable id or date are dropped.
    pub fn load(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let entries = match backend.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(values) => decode_entries(&key, values),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Stored entries are malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read stored entries, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(key = %key, count = entries.len(), "Loaded entry store");

        Self {
            backend,
            key,
            entries,
            last_issued_id: 0,
        }
    }

    /// All entries, newest first
    pub fn entries(&self) -> &[HealthEntry] {
        &self.entries
    }

    /// Find an entry by id
    pub fn get(&self, id: &str) -> Option<&HealthEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key the collection is persisted under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Generate a fresh id from the current timestamp.
    ///
    /// Ids are Unix milliseconds; a timestamp that is already taken (or was
    /// already handed out) is bumped forward until it is free.
    pub fn next_id(&mut self) -> String {
        let mut candidate = Utc::now().timestamp_millis().max(self.last_issued_id + 1);
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }

        self.last_issued_id = candidate;
        candidate.to_string()
    }

    /// Append an entry, restore date ordering and persist.
    ///
    /// On a backend failure the in-memory collection is left unchanged.
    pub fn add(&mut self, entry: HealthEntry) -> StorageResult<()> {
        if self.get(&entry.id).is_some() {
            return Err(StorageError::DuplicateEntry(entry.id));
        }

        let previous = self.entries.clone();
        let entry_id = entry.id.clone();
        let date = entry.date;

        self.entries.push(entry);
        sort_newest_first(&mut self.entries);

        if let Err(e) = self.persist() {
            self.entries = previous;
            return Err(e);
        }

        tracing::info!(entry_id = %entry_id, date = %date, total = self.entries.len(), "Added entry");
        Ok(())
    }

    /// Delete the entry with `id` and persist.
    ///
    /// Returns `false` without touching storage when no such entry exists.
    pub fn remove(&mut self, id: &str) -> StorageResult<bool> {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            tracing::debug!(entry_id = %id, "Remove of unknown entry ignored");
            return Ok(false);
        };

        let removed = self.entries.remove(index);

        if let Err(e) = self.persist() {
            self.entries.insert(index, removed);
            return Err(e);
        }

        tracing::info!(entry_id = %id, total = self.entries.len(), "Removed entry");
        Ok(true)
    }

    /// Verify the backend is readable
    pub fn check_backend(&self) -> StorageResult<()> {
        self.backend.get(&self.key).map(|_| ())
    }

    /// Collection encoded exactly as persisted
    pub fn to_json(&self) -> StorageResult<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    fn persist(&self) -> StorageResult<()> {
        let content = self.to_json()?;
        self.backend.set(&self.key, &content)
    }
}

impl std::fmt::Debug for EntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStore")
            .field("key", &self.key)
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Decode stored elements, skipping undecodable ones and repeated ids
fn decode_entries(key: &str, values: Vec<serde_json::Value>) -> Vec<HealthEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(values.len());

    for (index, value) in values.into_iter().enumerate() {
        match HealthEntry::from_stored(value) {
            Some(entry) if seen.insert(entry.id.clone()) => entries.push(entry),
            Some(entry) => {
                tracing::warn!(key = %key, index, entry_id = %entry.id, "Skipping stored entry with repeated id");
            }
            None => {
                tracing::warn!(key = %key, index, "Skipping stored entry without a valid id or date");
            }
        }
    }

    sort_newest_first(&mut entries);
    entries
}

/// Stable sort by date, newest first
fn sort_newest_first(entries: &mut [HealthEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::{FileStore, MemoryStore};
    use crate::storage::types::DATE_FORMAT;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn memory_store() -> (EntryStore, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        let store = EntryStore::load(backend.clone(), DEFAULT_STORAGE_KEY);
        (store, backend)
    }

    /// Backend that accepts reads and rejects every write
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let (store, _backend) = memory_store();
        assert!(store.is_empty());
        assert_eq!(store.key(), "healthEntries");
    }

    #[test]
    fn test_load_malformed_data_is_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();

        let store = EntryStore::load(backend.clone(), DEFAULT_STORAGE_KEY);
        assert!(store.is_empty());

        // Wrong shape is treated the same way
        backend.set(DEFAULT_STORAGE_KEY, r#"{"id":"1"}"#).unwrap();
        let store = EntryStore::load(backend, DEFAULT_STORAGE_KEY);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_keeps_valid_entries_beside_bad_ones() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set(
                DEFAULT_STORAGE_KEY,
                r#"[{"id":"1","date":"2024-01-02","weight":70},
                    {"id":"2","date":"2024-01-01","steps":-5},
                    {"id":"3","date":""},
                    {"id":"1","date":"2024-01-05"},
                    "junk"]"#,
            )
            .unwrap();

        let mut store = EntryStore::load(backend.clone(), DEFAULT_STORAGE_KEY);
        let ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(store.get("1").unwrap().weight, Some(70.0));
        assert_eq!(store.get("2").unwrap().steps, None);

        // The next write keeps what was loaded
        store.add(HealthEntry::new("4", date("2024-01-03"))).unwrap();
        let reloaded = EntryStore::load(backend, DEFAULT_STORAGE_KEY);
        let ids: Vec<&str> = reloaded.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "1", "2"]);
    }

    #[test]
    fn test_load_restores_ordering() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set(
                DEFAULT_STORAGE_KEY,
                r#"[{"id":"1","date":"2024-01-01"},{"id":"2","date":"2024-03-01"},{"id":"3","date":"2024-02-01"}]"#,
            )
            .unwrap();

        let store = EntryStore::load(backend, DEFAULT_STORAGE_KEY);
        let ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn test_add_keeps_newest_first() {
        let (mut store, _backend) = memory_store();

        let dates = [
            "2024-01-05", "2024-01-01", "2024-02-10", "2023-12-31", "2024-01-05", "2024-01-20",
        ];
        for (i, d) in dates.iter().enumerate() {
            store.add(HealthEntry::new(i.to_string(), date(d))).unwrap();

            let entries = store.entries();
            assert!(entries.windows(2).all(|w| w[0].date >= w[1].date));
        }

        assert_eq!(store.len(), dates.len());
    }

    #[test]
    fn test_same_date_keeps_insertion_order() {
        let (mut store, _backend) = memory_store();

        store.add(HealthEntry::new("a", date("2024-01-01"))).unwrap();
        store.add(HealthEntry::new("b", date("2024-01-01"))).unwrap();
        store.add(HealthEntry::new("c", date("2024-01-02"))).unwrap();

        let ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let (mut store, _backend) = memory_store();

        store.add(HealthEntry::new("1", date("2024-01-01"))).unwrap();
        let err = store
            .add(HealthEntry::new("1", date("2024-01-02")))
            .unwrap_err();

        assert!(matches!(err, StorageError::DuplicateEntry(id) if id == "1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_writes_through() {
        let (mut store, backend) = memory_store();

        store
            .add(HealthEntry::new("1", date("2024-01-01")).weight(70.0))
            .unwrap();

        let raw = backend.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"[{"id":"1","date":"2024-01-01","weight":70.0}]"#);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut store, backend) = memory_store();

        store.add(HealthEntry::new("1", date("2024-01-01"))).unwrap();
        store.add(HealthEntry::new("2", date("2024-01-02"))).unwrap();

        assert!(store.remove("1").unwrap());
        let after_first = backend.get(DEFAULT_STORAGE_KEY).unwrap();

        assert!(!store.remove("1").unwrap());
        assert_eq!(backend.get(DEFAULT_STORAGE_KEY).unwrap(), after_first);

        assert_eq!(store.len(), 1);
        assert!(store.get("2").is_some());
    }

    #[test]
    fn test_remove_unknown_id_on_empty_store() {
        let (mut store, backend) = memory_store();
        assert!(!store.remove("missing").unwrap());
        assert_eq!(backend.get(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_round_trip_preserves_all_fields() {
        let dir = tempdir().unwrap();
        let backend: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));

        let entry = HealthEntry::new("1704067200000", date("2024-01-01"))
            .weight(70.5)
            .calories(2100)
            .steps(0)
            .exercise("Swimming")
            .duration(45)
            .notes("  felt great  ");

        {
            let mut store = EntryStore::load(backend.clone(), DEFAULT_STORAGE_KEY);
            store.add(entry.clone()).unwrap();
        }

        let store = EntryStore::load(backend, DEFAULT_STORAGE_KEY);
        assert_eq!(store.entries(), &[entry]);
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let mut store = EntryStore::load(Arc::new(ReadOnlyStore), DEFAULT_STORAGE_KEY);

        let err = store
            .add(HealthEntry::new("1", date("2024-01-01")))
            .unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_next_id_is_unique() {
        let (mut store, _backend) = memory_store();

        let first = store.next_id();
        store.add(HealthEntry::new(first.clone(), date("2024-01-01"))).unwrap();

        let mut seen = vec![first];
        for _ in 0..100 {
            let id = store.next_id();
            assert!(!seen.contains(&id));
            assert!(id.parse::<i64>().is_ok());
            seen.push(id);
        }
    }

    #[test]
    fn test_scenario_store_order() {
        let (mut store, _backend) = memory_store();

        store
            .add(HealthEntry::new("a", date("2024-01-01")).weight(70.0))
            .unwrap();
        store
            .add(HealthEntry::new("b", date("2024-01-03")).weight(72.0))
            .unwrap();

        let dates: Vec<String> = store.entries().iter().map(|e| e.date_string()).collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-01"]);
    }
}
