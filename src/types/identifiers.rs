//! Identifier types for the yard access monitor
//!
//! Drivers, vehicles and access records are identified by numbers drawn from a
//! store-local monotonic sequence. Each identifier renders with a short prefix
//! (`DRV_7`, `VEH_3`, `ACC_42`) and accepts either the prefixed form or the bare
//! number when deserialized.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! sequence_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u64);

        impl $name {
            /// Prefix used by the textual form of this identifier
            pub const PREFIX: &'static str = $prefix;

            /// Raw sequence number
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", Self::PREFIX, self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                let digits = s.strip_prefix(Self::PREFIX).unwrap_or(&s);
                digits.parse::<u64>().map($name).map_err(serde::de::Error::custom)
            }
        }
    };
}

sequence_id!(
    /// Unique identifier for a registered driver
    DriverId,
    "DRV_"
);

sequence_id!(
    /// Unique identifier for a registered vehicle
    VehicleId,
    "VEH_"
);

sequence_id!(
    /// Unique identifier for one visit of a vehicle through the complex
    RecordId,
    "ACC_"
);

/// Monotonic id source owned by the entity store
///
/// Ids start at 1 and are never reused, even after deletions.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    last: u64,
}

impl IdSequence {
    /// Create a sequence whose first issued value is 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next value
    pub fn next_value(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Last value handed out (0 when nothing was issued yet)
    pub fn last_issued(&self) -> u64 {
        self.last
    }
}
