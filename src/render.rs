//! Terminal rendering
//!
//! Text versions of the three display modes: the log (stats cards and the
//! entry list), the weight chart, and the steps/duration charts. Charts are
//! horizontal bars, one row per point, oldest at the top.

use std::fmt::Write;

use crate::storage::HealthEntry;
use crate::tracker::{Tracker, View};
use crate::views::{ActivityPoint, Stats, WeightPoint};

/// Width of the longest bar, in characters
const BAR_WIDTH: usize = 40;

/// Padding added above and below the weight range (kg)
const WEIGHT_MARGIN: f64 = 2.0;

/// Render the tracker's active view
pub fn render(tracker: &Tracker) -> String {
    render_view(tracker, tracker.view())
}

/// Render one display mode
pub fn render_view(tracker: &Tracker, view: View) -> String {
    let mut out = render_stats(&tracker.stats());
    out.push('\n');

    match view {
        View::Log => {
            out.push_str("Recent Entries\n");
            out.push_str(&render_entries(tracker.entries()));
        }
        View::Weight => {
            out.push_str("Weight Progress\n");
            out.push_str(&render_weight_chart(&tracker.weight_series()));
        }
        View::Activity => {
            out.push_str("Activity Progress\n");
            out.push_str(&render_activity_charts(&tracker.activity_series()));
        }
    }

    out
}

/// Statistics cards
pub fn render_stats(stats: &Stats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {} kg", "Average Weight", stats.average_weight_display());
    let _ = writeln!(out, "{:<16} {}", "Total Workouts", stats.total_workouts);
    let _ = writeln!(
        out,
        "{:<16} {}",
        "Avg Steps/Day",
        format_thousands(stats.average_steps)
    );
    out
}

/// Entry list, newest first
pub fn render_entries(entries: &[HealthEntry]) -> String {
    if entries.is_empty() {
        return "No entries yet. Start tracking!\n".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{}  [{}]", entry.date.format("%B %d, %Y"), entry.id);

        if let Some(weight) = entry.weight {
            let _ = writeln!(out, "  Weight:   {} kg", weight);
        }
        if let Some(calories) = entry.calories {
            let _ = writeln!(out, "  Calories: {}", calories);
        }
        if let Some(steps) = entry.steps {
            let _ = writeln!(out, "  Steps:    {}", format_thousands(u64::from(steps)));
        }
        if let Some(exercise) = &entry.exercise {
            let _ = writeln!(out, "  Exercise: {}", exercise);
        }
        if let Some(duration) = entry.duration {
            let _ = writeln!(out, "  Duration: {} min", duration);
        }
        if let Some(notes) = &entry.notes {
            let _ = writeln!(out, "  Notes:    {}", notes);
        }
    }
    out
}

/// Weight chart; the axis spans the data range plus a 2 kg margin
pub fn render_weight_chart(series: &[WeightPoint]) -> String {
    if series.is_empty() {
        return "No weight data yet. Add some entries!\n".to_string();
    }

    let min = series.iter().map(|p| p.value).fold(f64::INFINITY, f64::min) - WEIGHT_MARGIN;
    let max = series.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max) + WEIGHT_MARGIN;

    let mut out = String::new();
    for point in series {
        let _ = writeln!(
            out,
            "{:<6} | {:<width$} {:.1} kg",
            point.label,
            bar(point.value - min, max - min),
            point.value,
            width = BAR_WIDTH
        );
    }
    out
}

/// Daily steps and exercise duration charts, both from zero
pub fn render_activity_charts(series: &[ActivityPoint]) -> String {
    if series.is_empty() {
        return "No activity data yet. Add some entries!\n".to_string();
    }

    let max_steps = series.iter().map(|p| p.steps).max().unwrap_or(0);
    let max_duration = series.iter().map(|p| p.duration).max().unwrap_or(0);

    let mut out = String::from("Daily Steps\n");
    for point in series {
        let _ = writeln!(
            out,
            "{:<6} | {:<width$} {}",
            point.label,
            bar(f64::from(point.steps), f64::from(max_steps)),
            format_thousands(u64::from(point.steps)),
            width = BAR_WIDTH
        );
    }

    out.push_str("\nExercise Duration\n");
    for point in series {
        let _ = writeln!(
            out,
            "{:<6} | {:<width$} {} min",
            point.label,
            bar(f64::from(point.duration), f64::from(max_duration)),
            point.duration,
            width = BAR_WIDTH
        );
    }
    out
}

/// Bar proportional to `value / span`, at most `BAR_WIDTH` long
fn bar(value: f64, span: f64) -> String {
    if span <= 0.0 {
        return String::new();
    }
    let len = ((value / span) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
    "#".repeat(len)
}

/// Group digits in thousands: 12345 -> "12,345"
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
