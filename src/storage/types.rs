//! Core data types for the health entry store
//!
//! - `HealthEntry`: one user-submitted daily record
//! - `DATE_FORMAT`: the calendar date format used on the wire and in forms

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Calendar date format for entry dates (`yyyy-MM-dd`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single daily health record
///
/// Optional measurements are `None` when not recorded. An absent field is
/// omitted from the JSON encoding entirely, so "not recorded" never turns
/// into a stored zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthEntry {
    /// Unique id, derived from the creation timestamp (Unix millis)
    pub id: String,
    /// Calendar day the measurements belong to
    pub date: NaiveDate,
    /// Body weight in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Calories consumed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    /// Steps walked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    /// Free-text exercise label (e.g. "Running")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<String>,
    /// Exercise duration in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HealthEntry {
    /// Create an entry with only the required fields
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
            weight: None,
            calories: None,
            steps: None,
            exercise: None,
            duration: None,
            notes: None,
        }
    }

    /// Builder method: set weight (kg)
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Builder method: set calories
    pub fn calories(mut self, calories: u32) -> Self {
        self.calories = Some(calories);
        self
    }

    /// Builder method: set steps
    pub fn steps(mut self, steps: u32) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Builder method: set exercise label
    pub fn exercise(mut self, exercise: impl Into<String>) -> Self {
        self.exercise = Some(exercise.into());
        self
    }

    /// Builder method: set exercise duration (minutes)
    pub fn duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    /// Builder method: set notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Whether this entry records a workout (non-blank exercise label)
    pub fn is_workout(&self) -> bool {
        self.exercise
            .as_deref()
            .map(|e| !e.trim().is_empty())
            .unwrap_or(false)
    }

    /// Whether this entry carries any activity measurement
    pub fn has_activity(&self) -> bool {
        self.steps.is_some() || self.duration.is_some()
    }

    /// Entry date formatted as `yyyy-MM-dd`
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Decode one element of a persisted collection.
    ///
    /// Other writers of the same key may store numeric ids, negative counts
    /// or a blank date. Measurements outside their domain decode as absent;
    /// `None` is returned only when the element has no usable id or date.
    pub fn from_stored(value: Value) -> Option<Self> {
        let raw: StoredEntry = serde_json::from_value(value).ok()?;

        let id = match raw.id {
            Value::String(s) if !s.is_empty() => s,
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let date = NaiveDate::parse_from_str(raw.date.as_str()?, DATE_FORMAT).ok()?;

        Some(Self {
            id,
            date,
            weight: raw.weight.as_f64().filter(|w| w.is_finite() && *w > 0.0),
            calories: stored_count(&raw.calories),
            steps: stored_count(&raw.steps),
            exercise: raw.exercise.as_str().map(str::to_string),
            duration: stored_count(&raw.duration),
            notes: raw.notes.as_str().map(str::to_string),
        })
    }
}

/// Loosely typed view of a persisted entry
#[derive(Deserialize)]
struct StoredEntry {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    date: Value,
    #[serde(default)]
    weight: Value,
    #[serde(default)]
    calories: Value,
    #[serde(default)]
    steps: Value,
    #[serde(default)]
    exercise: Value,
    #[serde(default)]
    duration: Value,
    #[serde(default)]
    notes: Value,
}

/// Non-negative whole count, fractions truncated
fn stored_count(value: &Value) -> Option<u32> {
    let n = value.as_f64()?.trunc();
    if n.is_finite() && n >= 0.0 && n <= f64::from(u32::MAX) {
        Some(n as u32)
    } else {
        None
    }
}
