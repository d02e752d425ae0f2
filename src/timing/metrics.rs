//! Dashboard counters

use crate::store::AccessRecord;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Headline counts for the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YardCounts {
    /// Records without an exit timestamp
    pub in_complex: usize,
    /// Records created on the current UTC day
    pub entries_today: usize,
    /// Records that exited on the current UTC day
    pub exits_today: usize,
}

impl YardCounts {
    /// Count records against the UTC calendar day of `now`
    pub fn compute(records: &[AccessRecord], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let on_today = |at: DateTime<Utc>| -> bool { same_day(at, today) };

        records.iter().fold(Self::default(), |mut counts, record| {
            if !record.is_closed() {
                counts.in_complex += 1;
            }
            if on_today(record.entry_timestamp) {
                counts.entries_today += 1;
            }
            if record.exit_timestamp.map_or(false, on_today) {
                counts.exits_today += 1;
            }
            counts
        })
    }
}

fn same_day(at: DateTime<Utc>, day: NaiveDate) -> bool {
    at.date_naive() == day
}
