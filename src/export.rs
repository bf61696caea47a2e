//! Entry export
//!
//! Writes the collection as CSV (one row per entry, absent fields as empty
//! cells) or as the same JSON array the store persists, pretty-printed.

use serde::Serialize;
use std::str::FromStr;

use crate::storage::{HealthEntry, StorageError, StorageResult};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("Unsupported export format: {}. Use: csv, json", other)),
        }
    }
}

/// Flat CSV row; `None` renders as an empty cell
#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    date: String,
    weight: Option<f64>,
    calories: Option<u32>,
    steps: Option<u32>,
    exercise: Option<&'a str>,
    duration: Option<u32>,
    notes: Option<&'a str>,
}

impl<'a> From<&'a HealthEntry> for CsvRow<'a> {
    fn from(entry: &'a HealthEntry) -> Self {
        Self {
            id: &entry.id,
            date: entry.date_string(),
            weight: entry.weight,
            calories: entry.calories,
            steps: entry.steps,
            exercise: entry.exercise.as_deref(),
            duration: entry.duration,
            notes: entry.notes.as_deref(),
        }
    }
}

/// Export entries in the given format
pub fn export_entries(entries: &[HealthEntry], format: ExportFormat) -> StorageResult<String> {
    match format {
        ExportFormat::Csv => to_csv(entries),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
    }
}

/// Format as CSV with a header row
pub fn to_csv(entries: &[HealthEntry]) -> StorageResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if entries.is_empty() {
        writer
            .write_record([
                "id", "date", "weight", "calories", "steps", "exercise", "duration", "notes",
            ])
            .map_err(csv_error)?;
    }

    for entry in entries {
        writer.serialize(CsvRow::from(entry)).map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
}

fn csv_error(err: csv::Error) -> StorageError {
    StorageError::Serialization(err.to_string())
}
