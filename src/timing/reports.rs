//! Report builders for the dashboard report pages
//!
//! Every report is recomputed from a slice of records; nothing is cached.
//! Car-carriers in the public yard are left out of the timing reports.

use super::alerts::Alert;
use super::durations::{
    as_hours, dwell, format_dwell, format_elapsed, pc1_dwell, time_in_complex, yard_dwell,
    NOT_AVAILABLE,
};
use super::metrics::YardCounts;
use crate::store::AccessRecord;
use crate::types::{Location, RecordId, VehicleType};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Timestamp layout used in report rows
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

const NO_STAMP: &str = "-";
const STILL_INSIDE: &str = "No Pátio";

fn format_stamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format(TIMESTAMP_FORMAT).to_string()).unwrap_or_else(|| NO_STAMP.to_string())
}

/// Route segment measured by [`segment_report`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// Leaving the yard until arriving at PC1
    YardToPc1,
    /// Leaving PC1 until leaving the complex
    Pc1ToExit,
}

impl Segment {
    /// Start and end stamps of the segment on a record
    pub fn bounds(&self, record: &AccessRecord) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match self {
            Segment::YardToPc1 => (record.patio_entry_timestamp, record.pc1_entry_timestamp),
            Segment::Pc1ToExit => (record.pc1_exit_timestamp, record.exit_timestamp),
        }
    }

    /// Report title
    pub fn title(&self) -> &'static str {
        match self {
            Segment::YardToPc1 => "Yard to PC1",
            Segment::Pc1ToExit => "PC1 to exit",
        }
    }
}

/// One record's travel time over a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRow {
    /// Record measured
    pub record: RecordId,
    /// Plate
    pub plate: String,
    /// Driver, when captured
    pub driver_name: Option<String>,
    /// Segment start
    pub started_at: DateTime<Utc>,
    /// Segment end
    pub ended_at: DateTime<Utc>,
    /// Whole minutes between start and end
    pub duration_minutes: i64,
    /// `HH:MM:SS` rendering of the duration
    pub formatted: String,
}

/// Travel times over a segment for every record that completed it, longest first
pub fn segment_report(records: &[AccessRecord], segment: Segment) -> Vec<SegmentRow> {
    let mut rows: Vec<(Duration, SegmentRow)> = records
        .iter()
        .filter(|r| r.is_tracked())
        .filter_map(|record| {
            let (start, end) = segment.bounds(record);
            let elapsed = dwell(start, end)?;
            Some((
                elapsed,
                SegmentRow {
                    record: record.id,
                    plate: record.plate.clone(),
                    driver_name: record.driver_name.clone(),
                    started_at: start?,
                    ended_at: end?,
                    duration_minutes: elapsed.num_minutes(),
                    formatted: format_elapsed(elapsed),
                },
            ))
        })
        .collect();

    rows.sort_by(|(a, ra), (b, rb)| b.cmp(a).then(ra.record.cmp(&rb.record)));
    rows.into_iter().map(|(_, row)| row).collect()
}

/// One record's time inside the complex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermanenceRow {
    /// Record measured
    pub record: RecordId,
    /// Plate
    pub plate: String,
    /// Driver, when captured
    pub driver_name: Option<String>,
    /// Screening entry
    pub entry: DateTime<Utc>,
    /// Exit, if the visit is complete
    pub exit: Option<DateTime<Utc>>,
    /// Time inside in hours (up to now for open visits)
    pub hours: f64,
    /// `HH:MM:SS` rendering of the time inside
    pub formatted: String,
}

/// Permanence page: occupancy, average visit length and per-record times
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermanenceSummary {
    /// Open tracked records
    pub vehicles_in_complex: usize,
    /// Tracked records that already exited
    pub completed_visits: usize,
    /// Average hours of completed visits (0 when there are none)
    pub average_hours: f64,
    /// Per-record permanence, longest first
    pub rows: Vec<PermanenceRow>,
}

/// Build the permanence summary at `now`
pub fn permanence_summary(records: &[AccessRecord], now: DateTime<Utc>) -> PermanenceSummary {
    let tracked: Vec<&AccessRecord> = records.iter().filter(|r| r.is_tracked()).collect();

    let completed: Vec<Duration> = tracked
        .iter()
        .filter_map(|r| r.exit_timestamp.map(|exit| exit - r.entry_timestamp))
        .collect();
    let average_hours = if completed.is_empty() {
        0.0
    } else {
        completed.iter().map(|d| as_hours(*d)).sum::<f64>() / completed.len() as f64
    };

    let mut rows: Vec<PermanenceRow> = tracked
        .iter()
        .map(|record| {
            let elapsed = time_in_complex(record, now);
            PermanenceRow {
                record: record.id,
                plate: record.plate.clone(),
                driver_name: record.driver_name.clone(),
                entry: record.entry_timestamp,
                exit: record.exit_timestamp,
                hours: as_hours(elapsed),
                formatted: format_elapsed(elapsed),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.hours.partial_cmp(&a.hours).unwrap_or(Ordering::Equal).then(a.record.cmp(&b.record))
    });

    PermanenceSummary {
        vehicles_in_complex: tracked.iter().filter(|r| !r.is_closed()).count(),
        completed_visits: completed.len(),
        average_hours,
        rows,
    }
}

/// One line of the detailed history page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    /// Record
    pub record: RecordId,
    /// Plate
    pub plate: String,
    /// Driver, when captured
    pub driver_name: Option<String>,
    /// Vehicle category
    pub vehicle_type: VehicleType,
    /// Current location
    pub location: Location,
    /// Raw entry instant, used for ordering
    pub entry_timestamp: DateTime<Utc>,
    /// Formatted screening entry
    pub entry: String,
    /// Formatted exit, or `No Pátio` while inside
    pub exit: String,
    /// Formatted yard segment start
    pub patio_entry: String,
    /// Formatted yard segment end
    pub patio_exit: String,
    /// Yard dwell in minutes, or `N/A`
    pub yard_dwell: String,
    /// Formatted PC1 arrival
    pub pc1_entry: String,
    /// Formatted PC1 departure
    pub pc1_exit: String,
    /// PC1 dwell in minutes, or `N/A`
    pub pc1_dwell: String,
    /// Time inside the complex, `HH:MM:SS`
    pub total_time: String,
    /// Average speed, or `N/A`
    pub speed: String,
    /// Formatted appointment, or `N/A`
    pub appointment: String,
    /// `Sim` when linked to Pegasus, `Não` otherwise
    pub pegasus: String,
    /// Yard color, or `N/A`
    pub patio_color: String,
}

/// Build the detailed history at `now`, newest entry first
pub fn detailed_history(records: &[AccessRecord], now: DateTime<Utc>) -> Vec<HistoryRow> {
    let mut rows: Vec<HistoryRow> = records
        .iter()
        .map(|record| HistoryRow {
            record: record.id,
            plate: record.plate.clone(),
            driver_name: record.driver_name.clone(),
            vehicle_type: record.vehicle_type,
            location: record.location,
            entry_timestamp: record.entry_timestamp,
            entry: record.entry_timestamp.format(TIMESTAMP_FORMAT).to_string(),
            exit: record
                .exit_timestamp
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_else(|| STILL_INSIDE.to_string()),
            patio_entry: format_stamp(record.patio_entry_timestamp),
            patio_exit: format_stamp(record.patio_exit_timestamp),
            yard_dwell: format_dwell(yard_dwell(record)),
            pc1_entry: format_stamp(record.pc1_entry_timestamp),
            pc1_exit: format_stamp(record.pc1_exit_timestamp),
            pc1_dwell: format_dwell(pc1_dwell(record)),
            total_time: format_elapsed(time_in_complex(record, now)),
            speed: record
                .speed_average
                .map(|kmh| format!("{} km/h", kmh))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            appointment: record
                .appointment_time
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            pegasus: if record.pegasus_linked_data == Some(true) { "Sim" } else { "Não" }
                .to_string(),
            patio_color: record
                .patio_color
                .map(|c| c.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        })
        .collect();

    rows.sort_by(|a, b| b.entry_timestamp.cmp(&a.entry_timestamp).then(b.record.cmp(&a.record)));
    rows
}

/// Everything the dashboard shows for one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Instant the report was computed for
    pub generated_at: DateTime<Utc>,
    /// Headline counts
    pub counts: YardCounts,
    /// Active alerts
    pub alerts: Vec<Alert>,
    /// Permanence page
    pub permanence: PermanenceSummary,
    /// Yard to PC1 travel times
    pub yard_to_pc1: Vec<SegmentRow>,
    /// PC1 to exit travel times
    pub pc1_to_exit: Vec<SegmentRow>,
}

impl DashboardReport {
    /// Compute every dashboard figure at `now`
    pub fn build(records: &[AccessRecord], alerts: &[Alert], now: DateTime<Utc>) -> Self {
        Self {
            generated_at: now,
            counts: YardCounts::compute(records, now),
            alerts: alerts.to_vec(),
            permanence: permanence_summary(records, now),
            yard_to_pc1: segment_report(records, Segment::YardToPc1),
            pc1_to_exit: segment_report(records, Segment::Pc1ToExit),
        }
    }

    /// Generate a human-readable report
    pub fn generate_summary_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Yard Dashboard Report ===\n\n");
        report.push_str(&format!(
            "Generated At: {}\n\n",
            self.generated_at.format(TIMESTAMP_FORMAT)
        ));

        report.push_str("Vehicles:\n");
        report.push_str(&format!("  • In Complex: {}\n", self.counts.in_complex));
        report.push_str(&format!("  • Entries Today: {}\n", self.counts.entries_today));
        report.push_str(&format!("  • Exits Today: {}\n\n", self.counts.exits_today));

        report.push_str(&format!("Active Alerts ({}):\n", self.alerts.len()));
        if self.alerts.is_empty() {
            report.push_str("  • None\n");
        }
        for alert in &self.alerts {
            report.push_str(&format!("  • [{}] {}\n", alert.severity, alert.message));
        }
        report.push('\n');

        report.push_str("Permanence:\n");
        report.push_str(&format!(
            "  • Tracked Vehicles Inside: {}\n",
            self.permanence.vehicles_in_complex
        ));
        report.push_str(&format!(
            "  • Average Visit: {:.2} h over {} completed visits\n",
            self.permanence.average_hours, self.permanence.completed_visits
        ));
        if let Some(longest) = self.permanence.rows.first() {
            report.push_str(&format!(
                "  • Longest Stay: {} ({})\n",
                longest.plate, longest.formatted
            ));
        }
        report.push('\n');

        for (segment, rows) in
            [(Segment::YardToPc1, &self.yard_to_pc1), (Segment::Pc1ToExit, &self.pc1_to_exit)]
        {
            report.push_str(&format!("{} ({} vehicles):\n", segment.title(), rows.len()));
            for row in rows.iter().take(SEGMENT_ROWS_IN_SUMMARY) {
                report.push_str(&format!("  • {}: {}\n", row.plate, row.formatted));
            }
            report.push('\n');
        }

        report
    }
}

/// Slowest rows listed per segment in the text report
const SEGMENT_ROWS_IN_SUMMARY: usize = 5;
