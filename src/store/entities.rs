//! Driver and vehicle registrations
//!
//! Registration input (`NewDriver`, `NewVehicle`) is validated and normalized
//! before the store assigns an id: names and plates are trimmed, plates are
//! uppercased and documents are stored with their CPF/CNPJ mask.

use crate::error::ValidationError;
use crate::formatting::{digits_only, format_document, normalize_plate, CNPJ_DIGITS, CPF_DIGITS};
use crate::types::{DriverId, VehicleId};
use serde::{Deserialize, Serialize};

/// A registered driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Store-assigned identifier
    pub id: DriverId,
    /// Full name
    pub name: String,
    /// Masked CPF or CNPJ
    pub document: String,
    /// Plate the driver usually arrives with
    pub plate: Option<String>,
}

/// Input for registering a driver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewDriver {
    /// Full name
    pub name: String,
    /// CPF or CNPJ, masked or bare digits
    pub document: String,
    /// Plate the driver usually arrives with
    pub plate: Option<String>,
}

impl NewDriver {
    /// Create driver input without a plate
    pub fn new(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self { name: name.into(), document: document.into(), plate: None }
    }

    /// Attach a usual plate
    pub fn with_plate(mut self, plate: impl Into<String>) -> Self {
        self.plate = Some(plate.into());
        self
    }

    pub(crate) fn into_driver(self, id: DriverId) -> Result<Driver, ValidationError> {
        let (name, document, plate) = normalize_driver_fields(&self.name, &self.document, self.plate)?;
        Ok(Driver { id, name, document, plate })
    }
}

impl Driver {
    /// Validate and normalize a full driver entry before it replaces a stored one
    pub(crate) fn normalized(self) -> Result<Driver, ValidationError> {
        let (name, document, plate) = normalize_driver_fields(&self.name, &self.document, self.plate)?;
        Ok(Driver { id: self.id, name, document, plate })
    }
}

fn normalize_driver_fields(
    name: &str,
    document: &str,
    plate: Option<String>,
) -> Result<(String, String, Option<String>), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::BlankField { field: "name" });
    }
    if document.trim().is_empty() {
        return Err(ValidationError::BlankField { field: "document" });
    }

    let digits = digits_only(document).len();
    if digits != CPF_DIGITS && digits != CNPJ_DIGITS {
        return Err(ValidationError::InvalidDocument { digits });
    }

    let plate = plate.map(|p| normalize_plate(&p)).filter(|p| !p.is_empty());
    Ok((name.to_string(), format_document(document), plate))
}

/// A registered vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Store-assigned identifier
    pub id: VehicleId,
    /// Plate, legacy or Mercosul layout (not enforced)
    pub plate: String,
    /// Model description
    pub model: String,
    /// Body color
    pub color: String,
}

/// Input for registering a vehicle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewVehicle {
    /// Plate
    pub plate: String,
    /// Model description
    pub model: String,
    /// Body color
    pub color: String,
}

impl NewVehicle {
    /// Create vehicle input
    pub fn new(
        plate: impl Into<String>,
        model: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self { plate: plate.into(), model: model.into(), color: color.into() }
    }

    pub(crate) fn into_vehicle(self, id: VehicleId) -> Result<Vehicle, ValidationError> {
        let plate = validated_plate(&self.plate)?;
        Ok(Vehicle { id, plate, model: self.model.trim().to_string(), color: self.color.trim().to_string() })
    }
}

impl Vehicle {
    pub(crate) fn normalized(self) -> Result<Vehicle, ValidationError> {
        let plate = validated_plate(&self.plate)?;
        Ok(Vehicle { plate, ..self })
    }
}

pub(crate) fn validated_plate(plate: &str) -> Result<String, ValidationError> {
    let plate = normalize_plate(plate);
    if plate.is_empty() {
        return Err(ValidationError::BlankField { field: "plate" });
    }
    Ok(plate)
}
