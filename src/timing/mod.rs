//! Timing analytics and alerting
//!
//! Everything here is a pure function of a record slice and an instant; the
//! engine never mutates the store.
//!
//! # Overview
//!
//! - **Durations**: dwell per segment, time inside the complex, `HH:MM:SS`
//! - **Metrics**: dashboard counts for the current UTC day
//! - **Reports**: segment travel times, permanence, detailed history
//! - **Alerts**: stuck-in-transit, overdue appointment and low speed rules
//!
//! # Usage Example
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use yard_access_monitor::store::*;
//! use yard_access_monitor::timing::*;
//! use yard_access_monitor::types::*;
//!
//! let mut store = EntityStore::new();
//! let start = Utc::now() - Duration::minutes(10);
//! let record = NewAccessRecord::new("ABC-1234", VehicleType::Normal)
//!     .at_location(Location::EnRouteToPc1)
//!     .with_patio_entry(start);
//! store.add_access_record_at(record, start).unwrap();
//!
//! let alerts = evaluate_alerts(store.access_records(), Utc::now(), &AlertThresholds::default());
//! assert_eq!(alerts[0].kind, AlertKind::StuckInTransit);
//!
//! let counts = YardCounts::compute(store.access_records(), Utc::now());
//! assert_eq!(counts.in_complex, 1);
//! ```

pub mod alerts;
pub mod durations;
pub mod metrics;
pub mod reports;

pub use alerts::*;
pub use durations::*;
pub use metrics::*;
pub use reports::*;
