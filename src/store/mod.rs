//! Entity store for drivers, vehicles and access records
//!
//! # Overview
//!
//! - **EntityStore**: owns the three collections, validates input, assigns ids
//! - **AccessRecord**: one visit through the complex with its stage timestamps
//! - **SharedStore**: `Arc<RwLock<_>>` handle shared by the feed and readers
//! - **StoreSnapshot**: detached copy for analytics and export
//!
//! # Usage Example
//!
//! ```rust
//! use yard_access_monitor::store::*;
//! use yard_access_monitor::types::*;
//!
//! let mut store = EntityStore::new();
//! let record = store
//!     .add_access_record(NewAccessRecord::new("ABC-1234", VehicleType::Normal))
//!     .unwrap();
//! assert_eq!(record.location, Location::Triagem);
//!
//! let inside = store.query_access_records(&RecordFilter::new().with_status(RecordStatus::InComplex));
//! assert_eq!(inside.len(), 1);
//! ```

pub mod access_record;
pub mod entities;
pub mod entity_store;
pub mod shared;

// Re-export all public types for convenience
pub use access_record::*;
pub use entities::*;
pub use entity_store::*;
pub use shared::*;
