//! Core types and identifiers for the yard access monitor
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the crate.
//!
//! # Overview
//!
//! - **Identifiers**: store-sequence identifiers for drivers, vehicles and access records
//! - **Enums**: checkpoint locations, vehicle types, yard colors, alert severities
//! - **Configuration**: monitor configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use yard_access_monitor::types::*;
//!
//! let record_id = RecordId(42);
//! assert_eq!(record_id.to_string(), "ACC_42");
//!
//! let location: Location = "Em Rota p/ PC1".parse().unwrap();
//! assert!(location.is_en_route());
//!
//! let config = YardConfig {
//!     stuck_in_transit_minutes: 8,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
