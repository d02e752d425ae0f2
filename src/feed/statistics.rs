//! Feed run statistics

use crate::types::VehicleType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Counters collected while the feed runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedStatistics {
    // Arrivals
    /// Normal vehicles synthesized
    pub normal_arrivals: usize,
    /// Service vehicles synthesized
    pub service_arrivals: usize,
    /// Car-carriers synthesized
    pub cegonha_arrivals: usize,

    // Progression
    /// Progression ticks run
    pub progression_ticks: usize,
    /// Transitions applied
    pub transitions_applied: usize,
    /// Transitions that were already applied
    pub no_op_transitions: usize,
    /// Records left in place by a tick
    pub records_held: usize,
    /// Records that exited the complex
    pub exits: usize,

    // Alerts
    /// Alert evaluations run
    pub alert_evaluations: usize,
    /// Alerts raised, summed over every evaluation
    pub alerts_raised: usize,
    /// Largest alert set seen in one evaluation
    pub peak_alerts: usize,

    /// Operations skipped after a recoverable error
    pub skipped_operations: usize,

    // Run metadata
    /// Feed clock at start
    pub started_at: Option<DateTime<Utc>>,
    /// Feed clock at the end
    pub finished_at: Option<DateTime<Utc>>,
    /// Wall-clock time spent running
    pub wall_clock: Duration,
}

impl FeedStatistics {
    /// Fresh counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an arrival
    pub fn record_arrival(&mut self, vehicle_type: VehicleType) {
        match vehicle_type {
            VehicleType::Normal => self.normal_arrivals += 1,
            VehicleType::Service => self.service_arrivals += 1,
            VehicleType::Cegonha => self.cegonha_arrivals += 1,
        }
    }

    /// Count an alert evaluation that produced `count` alerts
    pub fn record_alert_evaluation(&mut self, count: usize) {
        self.alert_evaluations += 1;
        self.alerts_raised += count;
        self.peak_alerts = self.peak_alerts.max(count);
    }

    /// Total arrivals of every type
    pub fn total_arrivals(&self) -> usize {
        self.normal_arrivals + self.service_arrivals + self.cegonha_arrivals
    }

    /// Share of arrivals of a type, in percent
    pub fn arrival_percentage(&self, vehicle_type: VehicleType) -> f64 {
        let total = self.total_arrivals();
        if total == 0 {
            return 0.0;
        }
        let count = match vehicle_type {
            VehicleType::Normal => self.normal_arrivals,
            VehicleType::Service => self.service_arrivals,
            VehicleType::Cegonha => self.cegonha_arrivals,
        };
        (count as f64 / total as f64) * 100.0
    }

    /// Average alerts per evaluation
    pub fn average_alerts(&self) -> f64 {
        if self.alert_evaluations == 0 {
            0.0
        } else {
            self.alerts_raised as f64 / self.alert_evaluations as f64
        }
    }

    /// Simulated span covered by the run
    pub fn simulated_span(&self) -> chrono::Duration {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end - start,
            _ => chrono::Duration::zero(),
        }
    }

    /// Generate a human-readable summary report
    pub fn generate_summary_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Feed Summary Report ===\n\n");

        report.push_str(&format!(
            "Simulated Span: {} min (wall clock {:.2} seconds)\n\n",
            self.simulated_span().num_minutes(),
            self.wall_clock.as_secs_f64()
        ));

        report.push_str("Arrivals:\n");
        report.push_str(&format!("  • Total: {}\n", self.total_arrivals()));
        for vehicle_type in [VehicleType::Normal, VehicleType::Service, VehicleType::Cegonha] {
            let count = match vehicle_type {
                VehicleType::Normal => self.normal_arrivals,
                VehicleType::Service => self.service_arrivals,
                VehicleType::Cegonha => self.cegonha_arrivals,
            };
            report.push_str(&format!(
                "  • {}: {} ({:.1}%)\n",
                vehicle_type,
                count,
                self.arrival_percentage(vehicle_type)
            ));
        }
        report.push('\n');

        report.push_str("Progression:\n");
        report.push_str(&format!("  • Ticks: {}\n", self.progression_ticks));
        report.push_str(&format!("  • Transitions Applied: {}\n", self.transitions_applied));
        report.push_str(&format!("  • No-op Transitions: {}\n", self.no_op_transitions));
        report.push_str(&format!("  • Records Held: {}\n", self.records_held));
        report.push_str(&format!("  • Exits: {}\n\n", self.exits));

        report.push_str("Alerts:\n");
        report.push_str(&format!("  • Evaluations: {}\n", self.alert_evaluations));
        report.push_str(&format!(
            "  • Alerts Raised: {} (avg {:.1}/evaluation)\n",
            self.alerts_raised,
            self.average_alerts()
        ));
        report.push_str(&format!("  • Peak Alerts: {}\n", self.peak_alerts));

        if self.skipped_operations > 0 {
            report.push_str(&format!("\nSkipped Operations: {}\n", self.skipped_operations));
        }

        report
    }
}

impl fmt::Display for FeedStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} arrivals, {} transitions, {} exits, {} alerts over {} evaluations",
            self.total_arrivals(),
            self.transitions_applied,
            self.exits,
            self.alerts_raised,
            self.alert_evaluations
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrival_counters() {
        let mut stats = FeedStatistics::new();
        for _ in 0..7 {
            stats.record_arrival(VehicleType::Normal);
        }
        stats.record_arrival(VehicleType::Cegonha);
        stats.record_arrival(VehicleType::Service);
        stats.record_arrival(VehicleType::Service);

        assert_eq!(stats.total_arrivals(), 10);
        assert_eq!(stats.arrival_percentage(VehicleType::Normal), 70.0);
        assert_eq!(stats.arrival_percentage(VehicleType::Cegonha), 10.0);
    }

    #[test]
    fn test_empty_statistics_avoid_division_by_zero() {
        let stats = FeedStatistics::new();
        assert_eq!(stats.arrival_percentage(VehicleType::Normal), 0.0);
        assert_eq!(stats.average_alerts(), 0.0);
        assert_eq!(stats.simulated_span(), chrono::Duration::zero());
    }

    #[test]
    fn test_alert_evaluations() {
        let mut stats = FeedStatistics::new();
        stats.record_alert_evaluation(2);
        stats.record_alert_evaluation(4);
        stats.record_alert_evaluation(0);
        assert_eq!(stats.alerts_raised, 6);
        assert_eq!(stats.peak_alerts, 4);
        assert_eq!(stats.average_alerts(), 2.0);
    }

    #[test]
    fn test_summary_report() {
        let mut stats = FeedStatistics::new();
        stats.record_arrival(VehicleType::Normal);
        stats.transitions_applied = 3;
        let report = stats.generate_summary_report();

        assert!(report.contains("=== Feed Summary Report ==="));
        assert!(report.contains("  • Total: 1"));
        assert!(report.contains("  • Normal: 1 (100.0%)"));
        assert!(report.contains("  • Transitions Applied: 3"));
        assert!(!report.contains("Skipped Operations"));
        assert_eq!(stats.to_string(), "1 arrivals, 3 transitions, 0 exits, 0 alerts over 0 evaluations");
    }
}
