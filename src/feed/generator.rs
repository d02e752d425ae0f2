//! Demo arrival generator
//!
//! Synthesizes screening entries the way a busy gate would produce them:
//! weighted vehicle categories, random plates, an appointment near the
//! arrival, and for vehicles that join mid-journey a consistent set of past
//! stage timestamps.

use crate::error::StoreResult;
use crate::formatting::{random_cpf, random_driver_name, random_plate};
use crate::store::{AccessRecord, EntityStore, NewAccessRecord, NewDriver};
use crate::types::{Location, PatioColor, VehicleType, YardConfig};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::debug;

/// Driver name recorded for service vehicles
pub const SERVICE_DRIVER_NAME: &str = "Veículo de Serviço";

/// Destination recorded for service vehicles
pub const SERVICE_DESTINATION: &str = "Acesso Livre";

/// Locations a synthesized arrival may start at
const STARTING_LOCATIONS: [Location; 4] = [
    Location::Triagem,
    Location::EnRouteToPc1,
    Location::Pc1,
    Location::EnRouteToTerminal,
];

/// Upper bounds, in seconds, for the gaps between backdated stages
const MAX_PC1_EXIT_AGE_SECS: i64 = 30;
const MAX_PC1_STAY_SECS: i64 = 60;
const MAX_YARD_STAY_SECS: i64 = 120;
const MAX_SCREENING_STAY_SECS: i64 = 60;

/// Knobs for the arrival generator
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalGenerator {
    normal_weight: f64,
    service_weight: f64,
    appointment_jitter: Duration,
    appointment_tolerance: Duration,
    pegasus_link_probability: f64,
}

/// A synthesized arrival before it reaches the store
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArrival {
    /// Screening input
    pub record: NewAccessRecord,
    /// Backdated creation instant
    pub entry: DateTime<Utc>,
    /// Driver to register alongside the record, if any
    pub driver: Option<NewDriver>,
}

impl Default for ArrivalGenerator {
    fn default() -> Self {
        Self::from_config(&YardConfig::default())
    }
}

impl ArrivalGenerator {
    /// Build the generator from the monitor configuration
    pub fn from_config(config: &YardConfig) -> Self {
        Self {
            normal_weight: config.normal_vehicle_weight,
            service_weight: config.service_vehicle_weight,
            appointment_jitter: Duration::minutes(config.appointment_jitter_minutes),
            appointment_tolerance: Duration::minutes(config.appointment_tolerance_minutes),
            pegasus_link_probability: config.pegasus_link_probability,
        }
    }

    /// Weighted vehicle category
    pub fn pick_vehicle_type<R: Rng>(&self, rng: &mut R) -> VehicleType {
        let roll: f64 = rng.gen();
        if roll < self.normal_weight {
            VehicleType::Normal
        } else if roll < self.normal_weight + self.service_weight {
            VehicleType::Service
        } else {
            VehicleType::Cegonha
        }
    }

    /// Synthesize one arrival observed at `now`
    pub fn generate<R: Rng>(&self, rng: &mut R, now: DateTime<Utc>) -> GeneratedArrival {
        let vehicle_type = self.pick_vehicle_type(rng);
        let plate = random_plate(rng);

        let jitter = self.appointment_jitter.num_seconds();
        let appointment = now + Duration::seconds(rng.gen_range(-jitter..=jitter));

        let mut record = NewAccessRecord::new(plate.clone(), vehicle_type)
            .with_appointment(appointment, self.appointment_tolerance)
            .with_pegasus_link(rng.gen_bool(self.pegasus_link_probability))
            .with_patio_color(random_patio_color(rng))
            .with_speed_average(f64::from(rng.gen_range(10u32..50)));

        let mut entry = now;
        if !vehicle_type.is_exempt_from_tracking() {
            let location = STARTING_LOCATIONS[rng.gen_range(0..STARTING_LOCATIONS.len())];
            let stamps = backdated_stamps(rng, location, now);
            record = record.at_location(location);
            record.patio_entry_timestamp = stamps.patio_entry;
            record.patio_exit_timestamp = stamps.patio_exit;
            record.pc1_entry_timestamp = stamps.pc1_entry;
            record.pc1_exit_timestamp = stamps.pc1_exit;
            entry = stamps.entry;
        }

        let driver = match vehicle_type {
            VehicleType::Service => {
                record.driver_name = Some(SERVICE_DRIVER_NAME.to_string());
                record.destination = Some(SERVICE_DESTINATION.to_string());
                None
            }
            VehicleType::Normal | VehicleType::Cegonha => {
                let name = random_driver_name(rng);
                let document = random_cpf(rng);
                record = record.with_driver(name.clone(), document.clone());
                Some(NewDriver::new(name, document).with_plate(plate))
            }
        };

        GeneratedArrival { record, entry, driver }
    }

    /// Synthesize an arrival and register it, plus its driver when unknown
    pub fn register<R: Rng>(
        &self,
        store: &mut EntityStore,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> StoreResult<AccessRecord> {
        let arrival = self.generate(rng, now);
        let mut record_input = arrival.record;

        if let Some(driver) = arrival.driver {
            match store.find_driver_by_document(&driver.document) {
                Some(known) => {
                    record_input.driver_name = Some(known.name.clone());
                }
                None => {
                    store.add_driver(driver)?;
                }
            }
        }

        let record = store.add_access_record_at(record_input, arrival.entry)?;
        debug!(record = %record.id, plate = %record.plate, location = %record.location, "Arrival synthesized");
        Ok(record)
    }
}

#[derive(Debug, Clone, Copy)]
struct StageStamps {
    entry: DateTime<Utc>,
    patio_entry: Option<DateTime<Utc>>,
    patio_exit: Option<DateTime<Utc>>,
    pc1_entry: Option<DateTime<Utc>>,
    pc1_exit: Option<DateTime<Utc>>,
}

fn step_back<R: Rng>(rng: &mut R, from: DateTime<Utc>, max_secs: i64) -> DateTime<Utc> {
    from - Duration::seconds(rng.gen_range(0..=max_secs))
}

/// Stage timestamps for a vehicle already at `location`, walking back from `now`
fn backdated_stamps<R: Rng>(rng: &mut R, location: Location, now: DateTime<Utc>) -> StageStamps {
    let stage = location.stage_index().unwrap_or(0);
    let mut cursor = now;
    let mut stamps =
        StageStamps { entry: now, patio_entry: None, patio_exit: None, pc1_entry: None, pc1_exit: None };

    if stage >= 3 {
        cursor = step_back(rng, cursor, MAX_PC1_EXIT_AGE_SECS);
        stamps.pc1_exit = Some(cursor);
    }
    if stage >= 2 {
        cursor = step_back(rng, cursor, MAX_PC1_STAY_SECS);
        stamps.pc1_entry = Some(cursor);
        stamps.patio_exit = Some(cursor);
    }
    if stage >= 1 {
        cursor = step_back(rng, cursor, MAX_YARD_STAY_SECS);
        stamps.patio_entry = Some(cursor);
        stamps.entry = step_back(rng, cursor, MAX_SCREENING_STAY_SECS);
    }
    stamps
}

/// Red above 0.7, then yellow on an even second roll, otherwise green
fn random_patio_color<R: Rng>(rng: &mut R) -> PatioColor {
    if rng.gen::<f64>() > 0.7 {
        PatioColor::Red
    } else if rng.gen::<f64>() > 0.5 {
        PatioColor::Yellow
    } else {
        PatioColor::Green
    }
}
