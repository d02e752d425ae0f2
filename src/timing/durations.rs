//! Dwell and elapsed time calculations

use crate::store::AccessRecord;
use chrono::{DateTime, Duration, Utc};

/// Placeholder shown for a segment that has not completed
pub const NOT_AVAILABLE: &str = "N/A";

/// Duration between two stage timestamps, when both are present
pub fn dwell(entry: Option<DateTime<Utc>>, exit: Option<DateTime<Utc>>) -> Option<Duration> {
    match (entry, exit) {
        (Some(entry), Some(exit)) => Some(exit - entry),
        _ => None,
    }
}

/// Time spent in the yard segment
pub fn yard_dwell(record: &AccessRecord) -> Option<Duration> {
    dwell(record.patio_entry_timestamp, record.patio_exit_timestamp)
}

/// Time spent at PC1
pub fn pc1_dwell(record: &AccessRecord) -> Option<Duration> {
    dwell(record.pc1_entry_timestamp, record.pc1_exit_timestamp)
}

/// Time inside the complex, up to exit or `now` for open records
pub fn time_in_complex(record: &AccessRecord, now: DateTime<Utc>) -> Duration {
    record.exit_timestamp.unwrap_or(now) - record.entry_timestamp
}

/// Live counter rendering, `HH:MM:SS`
///
/// Negative durations render as `00:00:00`. Hours are not wrapped at 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

/// Whole minutes of a dwell, or `"N/A"`
pub fn format_dwell(elapsed: Option<Duration>) -> String {
    match elapsed {
        Some(d) => format!("{} min", d.num_minutes()),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Duration in fractional hours
pub fn as_hours(elapsed: Duration) -> f64 {
    elapsed.num_seconds() as f64 / 3600.0
}
