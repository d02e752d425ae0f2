//! Threshold alerts
//!
//! Alerts are recomputed from scratch on every evaluation. Closed records and
//! car-carriers in the public yard never raise alerts.

use crate::store::AccessRecord;
use crate::types::config::thresholds;
use crate::types::{AlertSeverity, Location, RecordId, YardConfig};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Rule that raised an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// En-route for longer than the stuck threshold
    StuckInTransit,
    /// Appointment window ended while still at screening
    AppointmentOverdue,
    /// Driving below the speed threshold
    LowSpeed,
}

impl AlertKind {
    /// Severity attached to alerts of this kind
    pub fn severity(&self) -> AlertSeverity {
        match self {
            AlertKind::AppointmentOverdue => AlertSeverity::Danger,
            AlertKind::StuckInTransit | AlertKind::LowSpeed => AlertSeverity::Warning,
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::StuckInTransit => write!(f, "stuck in transit"),
            AlertKind::AppointmentOverdue => write!(f, "appointment overdue"),
            AlertKind::LowSpeed => write!(f, "low speed"),
        }
    }
}

/// A raised alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Record the alert is about
    pub record: RecordId,
    /// Plate of the record
    pub plate: String,
    /// Rule that fired
    pub kind: AlertKind,
    /// Severity
    pub severity: AlertSeverity,
    /// Operator-facing message
    pub message: String,
}

impl Alert {
    fn new(record: &AccessRecord, kind: AlertKind, message: String) -> Self {
        Self {
            record: record.id,
            plate: record.plate.clone(),
            kind,
            severity: kind.severity(),
            message,
        }
    }
}

/// Limits used by the alert rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    /// Maximum time en-route before a stuck alert
    pub stuck_in_transit: Duration,
    /// Speeds strictly below this raise a low speed alert
    pub low_speed_kmh: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            stuck_in_transit: Duration::minutes(thresholds::STUCK_IN_TRANSIT_MINUTES),
            low_speed_kmh: thresholds::LOW_SPEED_KMH,
        }
    }
}

impl From<&YardConfig> for AlertThresholds {
    fn from(config: &YardConfig) -> Self {
        Self {
            stuck_in_transit: config.stuck_in_transit_threshold(),
            low_speed_kmh: config.low_speed_threshold_kmh,
        }
    }
}

/// Evaluate every rule over the open tracked records at `now`
///
/// Danger alerts come first, then record order.
pub fn evaluate_alerts(
    records: &[AccessRecord],
    now: DateTime<Utc>,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = records
        .iter()
        .filter(|r| r.is_tracked() && !r.is_closed())
        .flat_map(|record| record_alerts(record, now, thresholds))
        .collect();

    alerts.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.record.cmp(&b.record)));
    debug!(count = alerts.len(), "Alerts evaluated");
    alerts
}

fn record_alerts(
    record: &AccessRecord,
    now: DateTime<Utc>,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let mut raised = Vec::new();

    if record.location.is_en_route() {
        if let Some(since) = record.entered_location_at() {
            let elapsed = now - since;
            if elapsed > thresholds.stuck_in_transit {
                raised.push(Alert::new(
                    record,
                    AlertKind::StuckInTransit,
                    format!(
                        "Vehicle {} stuck in transit ({}) for {} min",
                        record.plate,
                        record.location,
                        elapsed.num_minutes()
                    ),
                ));
            }
        }

        if let Some(speed) = record.speed_average {
            if speed < thresholds.low_speed_kmh {
                raised.push(Alert::new(
                    record,
                    AlertKind::LowSpeed,
                    format!(
                        "Vehicle {} average speed {} km/h below {} km/h",
                        record.plate, speed, thresholds.low_speed_kmh
                    ),
                ));
            }
        }
    }

    if record.location == Location::Triagem {
        if let Some(window_end) = record.appointment_window_end {
            if window_end < now {
                raised.push(Alert::new(
                    record,
                    AlertKind::AppointmentOverdue,
                    format!(
                        "Vehicle {} missed its appointment window ({} min overdue)",
                        record.plate,
                        (now - window_end).num_minutes()
                    ),
                ));
            }
        }
    }

    raised
}

/// Holder for the most recent alert set
#[derive(Debug, Clone, Default)]
pub struct AlertMonitor {
    thresholds: AlertThresholds,
    latest: Vec<Alert>,
    evaluated_at: Option<DateTime<Utc>>,
}

impl AlertMonitor {
    /// Monitor using the given thresholds
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds, latest: Vec::new(), evaluated_at: None }
    }

    /// Replace the current set with a fresh evaluation and return it
    pub fn refresh(&mut self, records: &[AccessRecord], now: DateTime<Utc>) -> &[Alert] {
        self.latest = evaluate_alerts(records, now, &self.thresholds);
        self.evaluated_at = Some(now);
        &self.latest
    }

    /// Alerts from the last evaluation
    pub fn current(&self) -> &[Alert] {
        &self.latest
    }

    /// Instant of the last evaluation
    pub fn evaluated_at(&self) -> Option<DateTime<Utc>> {
        self.evaluated_at
    }

    /// Thresholds in use
    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }
}
