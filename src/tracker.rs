//! Tracker session
//!
//! Ties the entry store, the form draft and the active display mode together.
//! Presentation layers drive the tracker: open it once at startup, forward
//! user actions, and read derived views fresh for every render.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::form::{EntryDraft, FormError};
use crate::storage::{EntryStore, HealthEntry, KeyValueStore, StorageError};
use crate::views::{self, ActivityPoint, Stats, WeightPoint};

/// Errors from tracker actions
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Form error: {0}")]
    Form(#[from] FormError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Display mode. Any mode can be entered from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Entry form and list
    #[default]
    Log,
    /// Weight chart
    Weight,
    /// Steps and duration charts
    Activity,
}

impl View {
    pub fn all() -> &'static [View] {
        &[View::Log, View::Weight, View::Activity]
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Log => write!(f, "log"),
            View::Weight => write!(f, "weight"),
            View::Activity => write!(f, "activity"),
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "log" => Ok(View::Log),
            "weight" => Ok(View::Weight),
            "activity" => Ok(View::Activity),
            other => Err(format!(
                "Unknown view: {}. Use: log, weight, activity",
                other
            )),
        }
    }
}

/// One user's tracking session
#[derive(Debug)]
pub struct Tracker {
    store: EntryStore,
    draft: EntryDraft,
    view: View,
}

impl Tracker {
    /// Load the persisted entries and start on the log view
    pub fn open(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self::from_store(EntryStore::load(backend, key))
    }

    pub fn from_store(store: EntryStore) -> Self {
        Self {
            store,
            draft: EntryDraft::new(),
            view: View::default(),
        }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// Entries, newest first
    pub fn entries(&self) -> &[HealthEntry] {
        self.store.entries()
    }

    pub fn draft(&self) -> &EntryDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut EntryDraft {
        &mut self.draft
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    /// Save the current draft as a new entry, dated relative to today
    pub fn save_entry(&mut self) -> Result<HealthEntry, TrackerError> {
        self.save_entry_on(Local::now().date_naive())
    }

    /// Save the current draft; `today` is the date the reset draft starts on.
    ///
    /// The draft is only reset once the entry is stored.
    pub fn save_entry_on(&mut self, today: NaiveDate) -> Result<HealthEntry, TrackerError> {
        let id = self.store.next_id();
        let entry = self.draft.to_entry(id)?;

        self.store.add(entry.clone())?;
        self.draft.reset(today);

        Ok(entry)
    }

    /// Save a draft that did not come from the session's own form
    pub fn submit(&mut self, draft: &EntryDraft) -> Result<HealthEntry, TrackerError> {
        let id = self.store.next_id();
        let entry = draft.to_entry(id)?;
        self.store.add(entry.clone())?;
        Ok(entry)
    }

    /// Delete an entry; unknown ids are ignored
    pub fn delete_entry(&mut self, id: &str) -> Result<bool, TrackerError> {
        Ok(self.store.remove(id)?)
    }

    pub fn weight_series(&self) -> Vec<WeightPoint> {
        views::weight_series(self.store.entries())
    }

    pub fn activity_series(&self) -> Vec<ActivityPoint> {
        views::activity_series(self.store.entries())
    }

    pub fn stats(&self) -> Stats {
        views::compute_stats(self.store.entries())
    }
}
