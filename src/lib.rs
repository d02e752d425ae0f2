//! Yard Access Monitor
//!
//! Checkpoint progression, dwell-time analytics and alerting for the access
//! control of a truck yard in a logistics complex.
//!
//! # Overview
//!
//! Trucks are screened at the gate ("Triagem"), drive to an inspection point
//! ("PC1"), continue to the terminal and leave. Each stage is stamped on the
//! vehicle's access record; counts, dwell times, reports and alerts are
//! recomputed from those stamps on every read.
//!
//! ## Key Features
//!
//! - **Entity Store**: drivers, vehicles and access records with validated input
//! - **Checkpoint State Machine**: strictly forward transitions with timestamp side effects
//! - **Timing Engine**: dwell per segment, time in complex, dashboard counts and reports
//! - **Alerting**: stuck-in-transit, missed appointment window and low speed rules
//! - **Simulation Feed**: seeded demo traffic on a simulated or real-time clock
//!
//! ## Quick Start
//!
//! ```rust
//! use yard_access_monitor::*;
//!
//! let mut store = EntityStore::new();
//! let record = store.add_access_record(NewAccessRecord::new("ABC1D23", VehicleType::Normal))?;
//!
//! store.advance_to_pc1_route(record.id)?;
//! store.arrive_at_pc1(record.id)?;
//!
//! let counts = YardCounts::compute(store.access_records(), chrono::Utc::now());
//! println!("{} vehicles inside", counts.in_complex);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: identifiers, enums and configuration
//! - [`error`]: error taxonomy and recovery handling
//! - [`store`]: entity store, shared handle and snapshots
//! - [`checkpoint`]: transition table and store commands
//! - [`timing`]: durations, counts, reports and alerts
//! - [`feed`]: simulation feed orchestration
//! - [`formatting`]: document masks and plate helpers
//! - [`logging`]: tracing subscriber setup
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │    Feed     │───►│    Store    │───►│ Checkpoint  │    │   Timing    │
//! │             │    │             │    │             │    │             │
//! │ Arrivals    │    │ Drivers     │    │ Transitions │    │ Dwell       │
//! │ Progression │    │ Vehicles    │◄───┤ Stamps      │    │ Reports     │
//! │ Alert ticks │    │ Records     │────┼─────────────┼───►│ Alerts      │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod checkpoint;
pub mod error;
pub mod feed;
pub mod formatting;
pub mod logging;
pub mod store;
pub mod timing;
pub mod types;

// Core types and identifiers
pub use types::{
    AlertSeverity,
    ConfigValidationError,
    // Identifiers
    DriverId,
    // Enums
    Location,
    NotFoundPolicy,
    OutputFormat,
    PatioColor,
    RecordId,
    RecordStatus,
    VehicleId,
    VehicleType,
    // Configuration
    YardConfig,
};

// Errors
pub use error::{EntityKind, FeedError, StoreError, ValidationError};

// Store
pub use store::{
    AccessRecord, Driver, EntityStore, NewAccessRecord, NewDriver, NewVehicle, RecordFilter,
    SharedStore, StoreSnapshot, Vehicle,
};

// State machine
pub use checkpoint::{Transition, TransitionOutcome};

// Timing and alerting
pub use timing::{
    detailed_history, evaluate_alerts, permanence_summary, segment_report, Alert, AlertKind,
    AlertMonitor, AlertThresholds, Segment, YardCounts,
};

// Feed
pub use feed::{FeedOrchestrator, FeedStatistics, TimeManager};
