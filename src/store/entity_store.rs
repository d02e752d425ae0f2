//! In-memory entity store
//!
//! Holds drivers, vehicles and access records. Every write replaces the
//! matching entry wholesale and bumps the store revision.

use crate::error::{EntityKind, StoreError, StoreResult};
use crate::store::access_record::validate_speed;
use crate::store::{AccessRecord, Driver, NewAccessRecord, NewDriver, NewVehicle, Vehicle};
use crate::types::{
    DriverId, IdSequence, NotFoundPolicy, PatioColor, RecordId, RecordStatus, VehicleId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Filter for access record listings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Case-insensitive plate substring
    pub plate_contains: Option<String>,
    /// Only records with this status
    pub status: Option<RecordStatus>,
}

impl RecordFilter {
    /// Filter matching every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to plates containing the given text
    pub fn with_plate(mut self, plate: impl Into<String>) -> Self {
        self.plate_contains = Some(plate.into());
        self
    }

    /// Restrict to a status
    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether a record passes the filter
    pub fn matches(&self, record: &AccessRecord) -> bool {
        let plate_ok = match self.plate_contains.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                record.plate.to_lowercase().contains(&needle.to_lowercase())
            }
            _ => true,
        };
        let status_ok = self.status.map_or(true, |status| record.status() == status);
        plate_ok && status_ok
    }
}

/// Single source of truth for drivers, vehicles and access records
#[derive(Debug, Clone)]
pub struct EntityStore {
    drivers: Vec<Driver>,
    vehicles: Vec<Vehicle>,
    records: Vec<AccessRecord>,
    /// Quick lookup map from record ID to index (records are never removed)
    record_index: HashMap<RecordId, usize>,
    driver_ids: IdSequence,
    vehicle_ids: IdSequence,
    record_ids: IdSequence,
    not_found_policy: NotFoundPolicy,
    revision: u64,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// Create an empty store that reports unknown ids
    pub fn new() -> Self {
        Self::with_policy(NotFoundPolicy::Report)
    }

    /// Create an empty store with the given not-found policy
    pub fn with_policy(not_found_policy: NotFoundPolicy) -> Self {
        Self {
            drivers: Vec::new(),
            vehicles: Vec::new(),
            records: Vec::new(),
            record_index: HashMap::new(),
            driver_ids: IdSequence::new(),
            vehicle_ids: IdSequence::new(),
            record_ids: IdSequence::new(),
            not_found_policy,
            revision: 0,
        }
    }

    /// Policy applied to updates and deletes that name unknown ids
    pub fn not_found_policy(&self) -> NotFoundPolicy {
        self.not_found_policy
    }

    /// Counter bumped on every successful mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn touch(&mut self) {
        self.revision += 1;
    }

    /// Resolve a miss according to the not-found policy
    fn missing(&self, entity: EntityKind, id: impl std::fmt::Display) -> StoreResult<bool> {
        match self.not_found_policy {
            NotFoundPolicy::Report => {
                warn!(%entity, %id, "Update or delete for unknown id");
                Err(StoreError::not_found(entity, id))
            }
            NotFoundPolicy::Ignore => {
                debug!(%entity, %id, "Ignoring update or delete for unknown id");
                Ok(false)
            }
        }
    }

    // Drivers

    /// Register a driver
    pub fn add_driver(&mut self, input: NewDriver) -> StoreResult<Driver> {
        let driver = input.into_driver(DriverId(self.driver_ids.last_issued() + 1))?;
        self.driver_ids.next_value();
        self.drivers.push(driver.clone());
        self.touch();
        info!(driver = %driver.id, "Driver registered");
        Ok(driver)
    }

    /// Replace the driver with the same id
    ///
    /// Returns `Ok(false)` when the id is unknown and the policy ignores misses.
    pub fn update_driver(&mut self, driver: Driver) -> StoreResult<bool> {
        let driver = driver.normalized()?;
        match self.drivers.iter().position(|d| d.id == driver.id) {
            Some(index) => {
                debug!(driver = %driver.id, "Driver updated");
                self.drivers[index] = driver;
                self.touch();
                Ok(true)
            }
            None => self.missing(EntityKind::Driver, driver.id),
        }
    }

    /// Remove a driver
    pub fn delete_driver(&mut self, id: DriverId) -> StoreResult<bool> {
        match self.drivers.iter().position(|d| d.id == id) {
            Some(index) => {
                self.drivers.remove(index);
                self.touch();
                debug!(driver = %id, "Driver deleted");
                Ok(true)
            }
            None => self.missing(EntityKind::Driver, id),
        }
    }

    /// Look up a driver
    pub fn driver(&self, id: DriverId) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    /// Look up a driver by document, masked or bare digits
    pub fn find_driver_by_document(&self, document: &str) -> Option<&Driver> {
        let wanted = crate::formatting::digits_only(document);
        if wanted.is_empty() {
            return None;
        }
        self.drivers.iter().find(|d| crate::formatting::digits_only(&d.document) == wanted)
    }

    /// All drivers in registration order
    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    // Vehicles

    /// Register a vehicle
    pub fn add_vehicle(&mut self, input: NewVehicle) -> StoreResult<Vehicle> {
        let vehicle = input.into_vehicle(VehicleId(self.vehicle_ids.last_issued() + 1))?;
        self.vehicle_ids.next_value();
        self.vehicles.push(vehicle.clone());
        self.touch();
        info!(vehicle = %vehicle.id, plate = %vehicle.plate, "Vehicle registered");
        Ok(vehicle)
    }

    /// Replace the vehicle with the same id
    pub fn update_vehicle(&mut self, vehicle: Vehicle) -> StoreResult<bool> {
        let vehicle = vehicle.normalized()?;
        match self.vehicles.iter().position(|v| v.id == vehicle.id) {
            Some(index) => {
                debug!(vehicle = %vehicle.id, "Vehicle updated");
                self.vehicles[index] = vehicle;
                self.touch();
                Ok(true)
            }
            None => self.missing(EntityKind::Vehicle, vehicle.id),
        }
    }

    /// Remove a vehicle
    pub fn delete_vehicle(&mut self, id: VehicleId) -> StoreResult<bool> {
        match self.vehicles.iter().position(|v| v.id == id) {
            Some(index) => {
                self.vehicles.remove(index);
                self.touch();
                debug!(vehicle = %id, "Vehicle deleted");
                Ok(true)
            }
            None => self.missing(EntityKind::Vehicle, id),
        }
    }

    /// Look up a vehicle
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// All vehicles in registration order
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    // Access records

    /// Create an access record entering now
    pub fn add_access_record(&mut self, input: NewAccessRecord) -> StoreResult<AccessRecord> {
        self.add_access_record_at(input, Utc::now())
    }

    /// Create an access record with an explicit creation instant
    pub fn add_access_record_at(
        &mut self,
        input: NewAccessRecord,
        entry_timestamp: DateTime<Utc>,
    ) -> StoreResult<AccessRecord> {
        let id = RecordId(self.record_ids.last_issued() + 1);
        let record = input.into_record(id, entry_timestamp)?;
        self.record_ids.next_value();

        self.record_index.insert(id, self.records.len());
        self.records.push(record.clone());
        self.touch();

        info!(
            record = %record.id,
            plate = %record.plate,
            vehicle_type = %record.vehicle_type,
            location = %record.location,
            "Access record created"
        );
        Ok(record)
    }

    /// Look up an access record
    pub fn access_record(&self, id: RecordId) -> Option<&AccessRecord> {
        self.record_index.get(&id).and_then(|&idx| self.records.get(idx))
    }

    /// Open record for a plate (exit screening lookup), newest first
    pub fn find_open_record_by_plate(&self, plate: &str) -> Option<&AccessRecord> {
        let wanted = crate::formatting::normalize_plate(plate);
        self.records.iter().rev().find(|r| !r.is_closed() && r.plate == wanted)
    }

    /// All access records in creation order
    pub fn access_records(&self) -> &[AccessRecord] {
        &self.records
    }

    /// Filtered records, newest entry first
    pub fn query_access_records(&self, filter: &RecordFilter) -> Vec<AccessRecord> {
        let mut matches: Vec<AccessRecord> =
            self.records.iter().filter(|r| filter.matches(r)).cloned().collect();
        matches.sort_by(|a, b| b.entry_timestamp.cmp(&a.entry_timestamp).then(b.id.cmp(&a.id)));
        matches
    }

    /// Mutable access to a record; unknown ids are always reported
    pub(crate) fn record_mut(&mut self, id: RecordId) -> StoreResult<&mut AccessRecord> {
        let record = self
            .record_index
            .get(&id)
            .and_then(|&idx| self.records.get_mut(idx))
            .ok_or_else(|| StoreError::not_found(EntityKind::AccessRecord, id))?;
        Ok(record)
    }

    fn update_open_record<F>(&mut self, id: RecordId, update: F) -> StoreResult<bool>
    where
        F: FnOnce(&mut AccessRecord),
    {
        if self.access_record(id).is_none() {
            return self.missing(EntityKind::AccessRecord, id);
        }
        let record = self.record_mut(id)?;
        if record.is_closed() {
            warn!(record = %id, "Rejected update on closed record");
            return Err(StoreError::RecordClosed(id));
        }
        update(record);
        self.touch();
        Ok(true)
    }

    /// Set whether the record is linked to the Pegasus system
    pub fn set_pegasus_link(&mut self, id: RecordId, linked: bool) -> StoreResult<bool> {
        self.update_open_record(id, |r| r.pegasus_linked_data = Some(linked))
    }

    /// Set the yard occupancy color
    pub fn set_patio_color(&mut self, id: RecordId, color: PatioColor) -> StoreResult<bool> {
        self.update_open_record(id, |r| r.patio_color = Some(color))
    }

    /// Set the average speed in km/h
    pub fn set_speed_average(&mut self, id: RecordId, kmh: f64) -> StoreResult<bool> {
        validate_speed(kmh)?;
        self.update_open_record(id, |r| r.speed_average = Some(kmh))
    }
}
