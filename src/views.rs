//! Derived Views
//!
//! Read-only projections of the entry collection used by the charts and the
//! statistics cards. Nothing here is cached or persisted; callers recompute
//! from the current entries on every render.
//!
//! Input is expected newest first (store order). Chart series come out
//! oldest first so they read left to right.

use serde::Serialize;

use crate::storage::HealthEntry;

/// Chart label format (`MMM dd`, e.g. "Jan 03")
pub const LABEL_FORMAT: &str = "%b %d";

/// Shown in place of the average weight when nothing has been weighed
pub const NO_VALUE: &str = "-";

/// One point of the weight chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightPoint {
    pub label: String,
    pub value: f64,
}

/// One point of the activity charts; a missing component is charted as zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPoint {
    pub label: String,
    pub steps: u32,
    pub duration: u32,
}

/// Aggregate statistics over the whole collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    /// Mean of recorded weights, unrounded
    pub average_weight: Option<f64>,
    /// Entries with a non-blank exercise label
    pub total_workouts: usize,
    /// Mean of recorded steps, rounded to the nearest integer (0 if none)
    pub average_steps: u64,
    /// Entries in the collection
    pub entry_count: usize,
}

impl Stats {
    /// Average weight as displayed: rounded once to one decimal, or "-"
    /// when unknown
    pub fn average_weight_display(&self) -> String {
        match self.average_weight {
            Some(w) => format!("{:.1}", w),
            None => NO_VALUE.to_string(),
        }
    }
}

/// Weight chart series, oldest first
pub fn weight_series(entries: &[HealthEntry]) -> Vec<WeightPoint> {
    entries
        .iter()
        .rev()
        .filter_map(|e| {
            e.weight.map(|value| WeightPoint {
                label: chart_label(e),
                value,
            })
        })
        .collect()
}

/// Activity chart series, oldest first
pub fn activity_series(entries: &[HealthEntry]) -> Vec<ActivityPoint> {
    entries
        .iter()
        .rev()
        .filter(|e| e.has_activity())
        .map(|e| ActivityPoint {
            label: chart_label(e),
            steps: e.steps.unwrap_or(0),
            duration: e.duration.unwrap_or(0),
        })
        .collect()
}

/// Compute statistics over all entries
pub fn compute_stats(entries: &[HealthEntry]) -> Stats {
    let weights: Vec<f64> = entries.iter().filter_map(|e| e.weight).collect();
    let steps: Vec<u64> = entries.iter().filter_map(|e| e.steps.map(u64::from)).collect();

    let average_weight = if weights.is_empty() {
        None
    } else {
        Some(weights.iter().sum::<f64>() / weights.len() as f64)
    };

    let average_steps = if steps.is_empty() {
        0
    } else {
        let mean = steps.iter().sum::<u64>() as f64 / steps.len() as f64;
        mean.round() as u64
    };

    Stats {
        average_weight,
        total_workouts: entries.iter().filter(|e| e.is_workout()).count(),
        average_steps,
        entry_count: entries.len(),
    }
}

fn chart_label(entry: &HealthEntry) -> String {
    entry.date.format(LABEL_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DATE_FORMAT;
    use chrono::NaiveDate;

    fn entry(id: &str, date: &str) -> HealthEntry {
        HealthEntry::new(id, NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap())
    }

    #[test]
    fn test_average_weight() {
        let entries = vec![
            entry("1", "2024-01-03").weight(70.0),
            entry("2", "2024-01-02").weight(72.0),
            entry("3", "2024-01-01").weight(71.0),
        ];

        let stats = compute_stats(&entries);
        assert_eq!(stats.average_weight, Some(71.0));
        assert_eq!(stats.average_weight_display(), "71.0");
    }

    #[test]
    fn test_average_weight_rounds_to_one_decimal() {
        let entries = vec![
            entry("1", "2024-01-03").weight(70.0),
            entry("2", "2024-01-02").weight(70.0),
            entry("3", "2024-01-01").weight(70.2),
        ];

        assert_eq!(compute_stats(&entries).average_weight_display(), "70.1");
    }

    #[test]
    fn test_average_weight_is_rounded_once() {
        // Mean is just under 70.05
        let entries = vec![
            entry("1", "2024-01-02").weight(70.0),
            entry("2", "2024-01-01").weight(70.1),
        ];

        assert_eq!(compute_stats(&entries).average_weight_display(), "70.0");
    }

    #[test]
    fn test_average_weight_without_weights() {
        let entries = vec![entry("1", "2024-01-01").steps(500)];

        let stats = compute_stats(&entries);
        assert_eq!(stats.average_weight, None);
        assert_eq!(stats.average_weight_display(), "-");
    }

    #[test]
    fn test_average_steps() {
        let entries = vec![
            entry("1", "2024-01-02").steps(10000),
            entry("2", "2024-01-01").steps(8000),
            entry("3", "2024-01-01").weight(70.0),
        ];
        assert_eq!(compute_stats(&entries).average_steps, 9000);

        let entries = vec![
            entry("1", "2024-01-02").steps(1),
            entry("2", "2024-01-01").steps(2),
        ];
        assert_eq!(compute_stats(&entries).average_steps, 2);

        assert_eq!(compute_stats(&[]).average_steps, 0);
    }

    #[test]
    fn test_total_workouts() {
        let entries = vec![
            entry("1", "2024-01-03").exercise("Running"),
            entry("2", "2024-01-02").exercise("Swimming"),
            entry("3", "2024-01-01").notes("rest day"),
        ];

        let stats = compute_stats(&entries);
        assert_eq!(stats.total_workouts, 2);
        assert_eq!(stats.entry_count, 3);
    }

    #[test]
    fn test_weight_series_is_oldest_first() {
        let entries = vec![
            entry("b", "2024-01-03").weight(72.0),
            entry("x", "2024-01-02").steps(3000),
            entry("a", "2024-01-01").weight(70.0),
        ];

        let series = weight_series(&entries);
        assert_eq!(
            series,
            vec![
                WeightPoint { label: "Jan 01".to_string(), value: 70.0 },
                WeightPoint { label: "Jan 03".to_string(), value: 72.0 },
            ]
        );
    }

    #[test]
    fn test_activity_series_defaults_missing_component() {
        let entries = vec![
            entry("3", "2024-02-03").duration(45),
            entry("2", "2024-02-02").weight(70.0),
            entry("1", "2024-02-01").steps(8000),
        ];

        let series = activity_series(&entries);
        assert_eq!(
            series,
            vec![
                ActivityPoint { label: "Feb 01".to_string(), steps: 8000, duration: 0 },
                ActivityPoint { label: "Feb 03".to_string(), steps: 0, duration: 45 },
            ]
        );

        // Source entries are untouched
        assert_eq!(entries[0].steps, None);
    }

    #[test]
    fn test_empty_collection() {
        assert!(weight_series(&[]).is_empty());
        assert!(activity_series(&[]).is_empty());

        let stats = compute_stats(&[]);
        assert_eq!(stats.total_workouts, 0);
        assert_eq!(stats.average_weight_display(), "-");
    }
}
