//! Access records: one visit of a vehicle through the complex
//!
//! A record is created at screening, moves through the checkpoint flow and is
//! closed when it exits. The store owns every record; callers only see clones.

use crate::error::ValidationError;
use crate::formatting::format_document;
use crate::store::entities::validated_plate;
use crate::types::{Location, PatioColor, RecordId, RecordStatus, VehicleType};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Stage names in the order their timestamps must appear
pub mod stages {
    /// Screening entry, set at creation
    pub const ENTRY: &str = "entry";
    /// Left the yard towards PC1
    pub const PATIO_ENTRY: &str = "patio_entry";
    /// Yard segment finished on PC1 arrival
    pub const PATIO_EXIT: &str = "patio_exit";
    /// Arrived at PC1
    pub const PC1_ENTRY: &str = "pc1_entry";
    /// Left PC1 towards the terminal
    pub const PC1_EXIT: &str = "pc1_exit";
    /// Left the complex
    pub const EXIT: &str = "exit";
}

/// One visit of a vehicle through the complex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRecord {
    /// Store-assigned identifier
    pub id: RecordId,
    /// Plate captured at screening
    pub plate: String,
    /// Vehicle category
    pub vehicle_type: VehicleType,
    /// Current checkpoint state
    pub location: Location,
    /// Creation instant, never changes
    pub entry_timestamp: DateTime<Utc>,
    /// Set once, when the record reaches `Saiu`
    pub exit_timestamp: Option<DateTime<Utc>>,
    /// Scheduled appointment
    pub appointment_time: Option<DateTime<Utc>>,
    /// Start of the appointment tolerance window
    pub appointment_window_start: Option<DateTime<Utc>>,
    /// End of the appointment tolerance window
    pub appointment_window_end: Option<DateTime<Utc>>,
    /// Yard segment start
    pub patio_entry_timestamp: Option<DateTime<Utc>>,
    /// Yard segment end
    pub patio_exit_timestamp: Option<DateTime<Utc>>,
    /// PC1 segment start
    pub pc1_entry_timestamp: Option<DateTime<Utc>>,
    /// PC1 segment end
    pub pc1_exit_timestamp: Option<DateTime<Utc>>,
    /// Whether the record is linked to the external Pegasus system
    pub pegasus_linked_data: Option<bool>,
    /// Yard occupancy color
    pub patio_color: Option<PatioColor>,
    /// Average speed in km/h
    pub speed_average: Option<f64>,
    /// Driver name captured at screening
    pub driver_name: Option<String>,
    /// Driver document captured at screening
    pub document: Option<String>,
    /// Declared destination
    pub destination: Option<String>,
}

impl AccessRecord {
    /// Whether the record has exited and became read-only
    pub fn is_closed(&self) -> bool {
        self.exit_timestamp.is_some()
    }

    /// Whether the record takes part in the checkpoint flow, alerts and timing
    pub fn is_tracked(&self) -> bool {
        !self.vehicle_type.is_exempt_from_tracking() && self.location.is_tracked()
    }

    /// Listing status of the record
    pub fn status(&self) -> RecordStatus {
        if self.is_closed() {
            RecordStatus::Exited
        } else {
            RecordStatus::InComplex
        }
    }

    /// Stage timestamps in flow order
    pub fn stage_timestamps(&self) -> [(&'static str, Option<DateTime<Utc>>); 6] {
        [
            (stages::ENTRY, Some(self.entry_timestamp)),
            (stages::PATIO_ENTRY, self.patio_entry_timestamp),
            (stages::PATIO_EXIT, self.patio_exit_timestamp),
            (stages::PC1_ENTRY, self.pc1_entry_timestamp),
            (stages::PC1_EXIT, self.pc1_exit_timestamp),
            (stages::EXIT, self.exit_timestamp),
        ]
    }

    /// Latest stage timestamp recorded so far
    pub fn latest_stage_timestamp(&self) -> DateTime<Utc> {
        self.stage_timestamps()
            .iter()
            .filter_map(|(_, at)| *at)
            .max()
            .unwrap_or(self.entry_timestamp)
    }

    /// Check that present stage timestamps never go backwards
    pub fn validate_stage_order(&self) -> Result<(), ValidationError> {
        let mut previous: Option<(&'static str, DateTime<Utc>)> = None;
        for (stage, at) in self.stage_timestamps() {
            let Some(at) = at else { continue };
            if let Some((earlier, earlier_at)) = previous {
                if at < earlier_at {
                    return Err(ValidationError::StageOrder {
                        earlier,
                        earlier_at,
                        later: stage,
                        later_at: at,
                    });
                }
            }
            previous = Some((stage, at));
        }
        Ok(())
    }

    /// Instant the record entered its current location, when known
    pub fn entered_location_at(&self) -> Option<DateTime<Utc>> {
        match self.location {
            Location::Triagem | Location::PublicYard => Some(self.entry_timestamp),
            Location::EnRouteToPc1 => self.patio_entry_timestamp,
            Location::Pc1 => self.pc1_entry_timestamp,
            Location::EnRouteToTerminal => self.pc1_exit_timestamp,
            Location::Exited => self.exit_timestamp,
        }
    }
}

/// Screening input for a new access record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccessRecord {
    /// Plate captured at screening
    pub plate: String,
    /// Vehicle category
    pub vehicle_type: VehicleType,
    /// Requested initial location (defaults to `Triagem`)
    pub location: Option<Location>,
    /// Scheduled appointment
    pub appointment_time: Option<DateTime<Utc>>,
    /// Start of the appointment tolerance window
    pub appointment_window_start: Option<DateTime<Utc>>,
    /// End of the appointment tolerance window
    pub appointment_window_end: Option<DateTime<Utc>>,
    /// Yard segment start, for records starting mid-journey
    pub patio_entry_timestamp: Option<DateTime<Utc>>,
    /// Yard segment end, for records starting mid-journey
    pub patio_exit_timestamp: Option<DateTime<Utc>>,
    /// PC1 segment start, for records starting mid-journey
    pub pc1_entry_timestamp: Option<DateTime<Utc>>,
    /// PC1 segment end, for records starting mid-journey
    pub pc1_exit_timestamp: Option<DateTime<Utc>>,
    /// Whether the record is linked to the external Pegasus system
    pub pegasus_linked_data: Option<bool>,
    /// Yard occupancy color
    pub patio_color: Option<PatioColor>,
    /// Average speed in km/h
    pub speed_average: Option<f64>,
    /// Driver name
    pub driver_name: Option<String>,
    /// Driver document
    pub document: Option<String>,
    /// Declared destination
    pub destination: Option<String>,
}

impl NewAccessRecord {
    /// Screening input with only plate and vehicle type
    pub fn new(plate: impl Into<String>, vehicle_type: VehicleType) -> Self {
        Self {
            plate: plate.into(),
            vehicle_type,
            location: None,
            appointment_time: None,
            appointment_window_start: None,
            appointment_window_end: None,
            patio_entry_timestamp: None,
            patio_exit_timestamp: None,
            pc1_entry_timestamp: None,
            pc1_exit_timestamp: None,
            pegasus_linked_data: None,
            patio_color: None,
            speed_average: None,
            driver_name: None,
            document: None,
            destination: None,
        }
    }

    /// Start the record at a given location
    pub fn at_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the appointment and a symmetric tolerance window around it
    pub fn with_appointment(mut self, time: DateTime<Utc>, tolerance: Duration) -> Self {
        self.appointment_time = Some(time);
        self.appointment_window_start = Some(time - tolerance);
        self.appointment_window_end = Some(time + tolerance);
        self
    }

    /// Set the appointment window explicitly
    pub fn with_appointment_window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.appointment_window_start = Some(start);
        self.appointment_window_end = Some(end);
        self
    }

    /// Set the yard segment start
    pub fn with_patio_entry(mut self, at: DateTime<Utc>) -> Self {
        self.patio_entry_timestamp = Some(at);
        self
    }

    /// Set the yard segment end
    pub fn with_patio_exit(mut self, at: DateTime<Utc>) -> Self {
        self.patio_exit_timestamp = Some(at);
        self
    }

    /// Set the PC1 segment start
    pub fn with_pc1_entry(mut self, at: DateTime<Utc>) -> Self {
        self.pc1_entry_timestamp = Some(at);
        self
    }

    /// Set the PC1 segment end
    pub fn with_pc1_exit(mut self, at: DateTime<Utc>) -> Self {
        self.pc1_exit_timestamp = Some(at);
        self
    }

    /// Set the Pegasus link flag
    pub fn with_pegasus_link(mut self, linked: bool) -> Self {
        self.pegasus_linked_data = Some(linked);
        self
    }

    /// Set the yard occupancy color
    pub fn with_patio_color(mut self, color: PatioColor) -> Self {
        self.patio_color = Some(color);
        self
    }

    /// Set the average speed
    pub fn with_speed_average(mut self, kmh: f64) -> Self {
        self.speed_average = Some(kmh);
        self
    }

    /// Set the driver captured at screening
    pub fn with_driver(mut self, name: impl Into<String>, document: impl Into<String>) -> Self {
        self.driver_name = Some(name.into());
        self.document = Some(document.into());
        self
    }

    /// Set the declared destination
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub(crate) fn into_record(
        self,
        id: RecordId,
        entry_timestamp: DateTime<Utc>,
    ) -> Result<AccessRecord, ValidationError> {
        let plate = validated_plate(&self.plate)?;
        if let Some(speed) = self.speed_average {
            validate_speed(speed)?;
        }

        let mut stamps = [
            (stages::PATIO_ENTRY, 1, self.patio_entry_timestamp),
            (stages::PATIO_EXIT, 2, self.patio_exit_timestamp),
            (stages::PC1_ENTRY, 2, self.pc1_entry_timestamp),
            (stages::PC1_EXIT, 3, self.pc1_exit_timestamp),
        ];

        let location = if self.vehicle_type.is_exempt_from_tracking() {
            // Car-carriers skip the flow entirely
            for (_, _, at) in stamps.iter_mut() {
                *at = None;
            }
            Location::PublicYard
        } else {
            let requested = self.location.unwrap_or(Location::Triagem);
            if matches!(requested, Location::Exited | Location::PublicYard) {
                return Err(ValidationError::IllegalInitialLocation {
                    location: requested,
                    vehicle_type: self.vehicle_type,
                });
            }
            let reached = requested.stage_index().unwrap_or(0);
            // A stamp belongs to a location exactly when that location has reached its stage
            for (stage, min_stage, at) in stamps.iter() {
                match (at, reached >= *min_stage) {
                    (Some(_), false) => {
                        return Err(ValidationError::UnexpectedStage { stage: *stage, location: requested })
                    }
                    (None, true) => {
                        return Err(ValidationError::MissingStage { stage: *stage, location: requested })
                    }
                    _ => {}
                }
            }
            requested
        };

        if let (Some(start), Some(end)) = (self.appointment_window_start, self.appointment_window_end)
        {
            if end < start {
                return Err(ValidationError::StageOrder {
                    earlier: "appointment_window_start",
                    earlier_at: start,
                    later: "appointment_window_end",
                    later_at: end,
                });
            }
        }

        let record = AccessRecord {
            id,
            plate,
            vehicle_type: self.vehicle_type,
            location,
            entry_timestamp,
            exit_timestamp: None,
            appointment_time: self.appointment_time,
            appointment_window_start: self.appointment_window_start,
            appointment_window_end: self.appointment_window_end,
            patio_entry_timestamp: stamps[0].2,
            patio_exit_timestamp: stamps[1].2,
            pc1_entry_timestamp: stamps[2].2,
            pc1_exit_timestamp: stamps[3].2,
            pegasus_linked_data: self.pegasus_linked_data,
            patio_color: self.patio_color,
            speed_average: self.speed_average,
            driver_name: non_blank(self.driver_name),
            document: non_blank(self.document).map(|d| format_document(&d)),
            destination: non_blank(self.destination),
        };

        record.validate_stage_order()?;
        Ok(record)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Reject negative or non-finite speeds
pub(crate) fn validate_speed(kmh: f64) -> Result<(), ValidationError> {
    if kmh.is_finite() && kmh >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidSpeed(kmh))
    }
}
