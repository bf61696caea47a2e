//! Entry Form State
//!
//! An [`EntryDraft`] is the in-progress, unsaved form: every field is raw
//! text exactly as typed. Submitting coerces the text into a [`HealthEntry`]
//! and resets the draft.
//!
//! Coercion never rejects a measurement. Empty, non-numeric or out-of-range
//! input becomes an absent field; only an unparseable date fails.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::storage::{HealthEntry, DATE_FORMAT};

/// Errors raised when submitting a draft
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    /// Date text is not a `yyyy-MM-dd` calendar date
    #[error("Invalid date {0:?}: expected yyyy-MM-dd")]
    InvalidDate(String),
}

/// Raw form input for one entry
///
/// When decoded from JSON, a field may be a string or a number; numbers are
/// kept as their text. Null and other values count as empty input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryDraft {
    #[serde(deserialize_with = "raw_text")]
    pub date: String,
    #[serde(deserialize_with = "raw_text")]
    pub weight: String,
    #[serde(deserialize_with = "raw_text")]
    pub calories: String,
    #[serde(deserialize_with = "raw_text")]
    pub steps: String,
    #[serde(deserialize_with = "raw_text")]
    pub exercise: String,
    #[serde(deserialize_with = "raw_text")]
    pub duration: String,
    #[serde(deserialize_with = "raw_text")]
    pub notes: String,
}

fn raw_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

impl Default for EntryDraft {
    fn default() -> Self {
        Self::for_date(Local::now().date_naive())
    }
}

impl EntryDraft {
    /// Empty draft dated today
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty draft dated `date`
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            weight: String::new(),
            calories: String::new(),
            steps: String::new(),
            exercise: String::new(),
            duration: String::new(),
            notes: String::new(),
        }
    }

    /// Discard all input; the date goes back to `today`
    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::for_date(today);
    }

    /// Build the entry this draft describes without consuming the draft
    pub fn to_entry(&self, id: impl Into<String>) -> Result<HealthEntry, FormError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|_| FormError::InvalidDate(self.date.clone()))?;

        Ok(HealthEntry {
            id: id.into(),
            date,
            weight: parse_weight(&self.weight),
            calories: parse_count(&self.calories),
            steps: parse_count(&self.steps),
            exercise: parse_text(&self.exercise),
            duration: parse_count(&self.duration),
            notes: parse_text(&self.notes),
        })
    }

    /// Convert the draft into an entry and reset it for `today`.
    ///
    /// On error the draft keeps its input so it can be corrected.
    pub fn submit(
        &mut self,
        id: impl Into<String>,
        today: NaiveDate,
    ) -> Result<HealthEntry, FormError> {
        let entry = self.to_entry(id)?;
        self.reset(today);
        Ok(entry)
    }
}

/// Weight in kg: any positive finite decimal
pub fn parse_weight(input: &str) -> Option<f64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    input
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w > 0.0)
}

/// Non-negative integer count; fractional input is truncated
pub fn parse_count(input: &str) -> Option<u32> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(n) = input.parse::<u32>() {
        return Some(n);
    }

    let value = input.parse::<f64>().ok()?.trunc();
    if value.is_finite() && value >= 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

/// Free text: blank becomes absent, anything else is kept verbatim
pub fn parse_text(input: &str) -> Option<String> {
    if input.trim().is_empty() {
        None
    } else {
        Some(input.to_string())
    }
}
