//! Shared store handle and read snapshots
//!
//! Writers take the write lock for one read-modify-write; readers clone a
//! [`StoreSnapshot`] and compute on it without holding the lock.

use crate::store::{AccessRecord, Driver, EntityStore, Vehicle};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::{Arc, PoisonError, RwLock};

/// Immutable copy of the store contents at one revision
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Store revision the snapshot was taken at
    pub revision: u64,
    /// Registered drivers
    pub drivers: Vec<Driver>,
    /// Registered vehicles
    pub vehicles: Vec<Vehicle>,
    /// Access records in creation order
    pub access_records: Vec<AccessRecord>,
}

impl EntityStore {
    /// Clone the current contents
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            revision: self.revision(),
            drivers: self.drivers().to_vec(),
            vehicles: self.vehicles().to_vec(),
            access_records: self.access_records().to_vec(),
        }
    }
}

impl StoreSnapshot {
    /// Write every access record as one JSON object per line
    ///
    /// Returns the number of lines written.
    pub fn write_records_jsonl<W: Write>(&self, mut writer: W) -> io::Result<usize> {
        for record in &self.access_records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(self.access_records.len())
    }
}

/// Cloneable, thread-safe handle to one [`EntityStore`]
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<EntityStore>>,
}

impl SharedStore {
    /// Wrap a store
    pub fn new(store: EntityStore) -> Self {
        Self { inner: Arc::new(RwLock::new(store)) }
    }

    /// Run a read-only closure under the read lock
    pub fn read<R>(&self, f: impl FnOnce(&EntityStore) -> R) -> R {
        // A writer that panicked left at most one half-applied assignment
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run a mutation under the write lock
    pub fn write<R>(&self, f: impl FnOnce(&mut EntityStore) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Clone the current contents
    pub fn snapshot(&self) -> StoreSnapshot {
        self.read(EntityStore::snapshot)
    }

    /// Current store revision
    pub fn revision(&self) -> u64 {
        self.read(EntityStore::revision)
    }
}
