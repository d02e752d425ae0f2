//! Simulation feed
//!
//! Stands in for real gate and checkpoint input during demos.
//!
//! # Overview
//!
//! - **FeedOrchestrator**: schedules arrivals, progression ticks and alert evaluations
//! - **TimeManager**: simulated (instant) or real-time clock with a stop flag
//! - **ArrivalGenerator**: synthesizes screening entries with consistent stage timestamps
//! - **ProgressionTicker**: moves records one legal step at a time, at random
//! - **FeedStatistics**: counters and a text summary for the run
//!
//! # Usage Example
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use yard_access_monitor::feed::*;
//! use yard_access_monitor::types::*;
//!
//! let config = YardConfig { seed: Some(7), duration_minutes: 2, ..Default::default() };
//! let mut feed = FeedOrchestrator::with_clock(config, TimeManager::simulated(Utc::now())).unwrap();
//!
//! let stats = feed.run().unwrap();
//! assert_eq!(stats.total_arrivals(), 24);
//! assert_eq!(stats.simulated_span(), Duration::minutes(2));
//! ```

pub mod generator;
pub mod orchestrator;
pub mod progression;
pub mod statistics;
pub mod time_manager;

// Re-export all public types for convenience
pub use generator::*;
pub use orchestrator::*;
pub use progression::*;
pub use statistics::*;
pub use time_manager::*;
