//! Enumeration types for the yard access monitor
//!
//! This module contains the checkpoint locations a record moves through, the
//! vehicle categories screened at the gate, the yard occupancy colors, alert
//! severities, record status filters and report output formats.
//!
//! Locations, vehicle types and colors serialize to the labels shown on the
//! yard dashboard (`"Em Rota p/ PC1"`, `"Serviço"`, `"green"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Checkpoint state of an access record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// Screening, where the vehicle is classified and registered
    #[serde(rename = "Triagem")]
    Triagem,
    /// Driving from the yard towards the PC1 inspection point
    #[serde(rename = "Em Rota p/ PC1")]
    EnRouteToPc1,
    /// At the PC1 inspection point
    #[serde(rename = "PC1")]
    Pc1,
    /// Driving from PC1 towards the terminal
    #[serde(rename = "Em Rota p/ Terminal")]
    EnRouteToTerminal,
    /// Left the complex; terminal state
    #[serde(rename = "Saiu")]
    Exited,
    /// Holding area for car-carriers, outside the tracked flow
    #[serde(rename = "Pátio Público")]
    PublicYard,
}

impl Location {
    /// Tracked checkpoint states in progression order
    pub const FLOW: [Location; 5] = [
        Location::Triagem,
        Location::EnRouteToPc1,
        Location::Pc1,
        Location::EnRouteToTerminal,
        Location::Exited,
    ];

    /// Dashboard label of this location
    pub fn label(&self) -> &'static str {
        match self {
            Location::Triagem => "Triagem",
            Location::EnRouteToPc1 => "Em Rota p/ PC1",
            Location::Pc1 => "PC1",
            Location::EnRouteToTerminal => "Em Rota p/ Terminal",
            Location::Exited => "Saiu",
            Location::PublicYard => "Pátio Público",
        }
    }

    /// Whether the vehicle is driving between two checkpoints
    pub fn is_en_route(&self) -> bool {
        matches!(self, Location::EnRouteToPc1 | Location::EnRouteToTerminal)
    }

    /// Whether this is the terminal exited state
    pub fn is_exited(&self) -> bool {
        matches!(self, Location::Exited)
    }

    /// Whether this location belongs to the tracked checkpoint flow
    pub fn is_tracked(&self) -> bool {
        !matches!(self, Location::PublicYard)
    }

    /// Position in the checkpoint flow (`None` for the public yard)
    pub fn stage_index(&self) -> Option<usize> {
        Self::FLOW.iter().position(|l| l == self)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "triagem" | "screening" => Ok(Location::Triagem),
            "em rota p/ pc1" | "en route to pc1" | "enroutetopc1" => Ok(Location::EnRouteToPc1),
            "pc1" => Ok(Location::Pc1),
            "em rota p/ terminal" | "en route to terminal" | "enroutetoterminal" => {
                Ok(Location::EnRouteToTerminal)
            }
            "saiu" | "exited" => Ok(Location::Exited),
            "pátio público" | "patio publico" | "public yard" | "publicyard" => {
                Ok(Location::PublicYard)
            }
            _ => Err(format!("Unknown location: {}", s)),
        }
    }
}

/// Vehicle category declared at screening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    /// Regular cargo truck
    #[serde(rename = "Normal")]
    Normal,
    /// Car-carrier, parked in the public yard and never tracked
    #[serde(rename = "Cegonha")]
    Cegonha,
    /// Service vehicle with free access
    #[serde(rename = "Serviço")]
    Service,
}

impl VehicleType {
    /// Dashboard label of this vehicle type
    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Normal => "Normal",
            VehicleType::Cegonha => "Cegonha",
            VehicleType::Service => "Serviço",
        }
    }

    /// Whether records of this type skip the checkpoint flow
    pub fn is_exempt_from_tracking(&self) -> bool {
        matches!(self, VehicleType::Cegonha)
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(VehicleType::Normal),
            "cegonha" | "car carrier" | "carcarrier" => Ok(VehicleType::Cegonha),
            "serviço" | "servico" | "service" => Ok(VehicleType::Service),
            _ => Err(format!("Unknown vehicle type: {}", s)),
        }
    }
}

/// Yard occupancy indicator attached to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatioColor {
    /// Low occupancy
    Green,
    /// Medium occupancy
    Yellow,
    /// High occupancy
    Red,
}

impl fmt::Display for PatioColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatioColor::Green => write!(f, "green"),
            PatioColor::Yellow => write!(f, "yellow"),
            PatioColor::Red => write!(f, "red"),
        }
    }
}

impl FromStr for PatioColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "green" => Ok(PatioColor::Green),
            "yellow" => Ok(PatioColor::Yellow),
            "red" => Ok(PatioColor::Red),
            _ => Err(format!("Unknown patio color: {}", s)),
        }
    }
}

/// Severity of a raised alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Needs attention
    Warning,
    /// Needs action now
    Danger,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Danger => write!(f, "danger"),
        }
    }
}

/// Status filter for access record listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Still inside the complex (no exit timestamp)
    InComplex,
    /// Already left the complex
    Exited,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::InComplex => write!(f, "In Complex"),
            RecordStatus::Exited => write!(f, "Exited"),
        }
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in complex" | "incomplex" | "no pátio" | "no patio" => Ok(RecordStatus::InComplex),
            "exited" | "saiu" => Ok(RecordStatus::Exited),
            _ => Err(format!("Unknown record status: {}", s)),
        }
    }
}

/// Output format options for the dashboard report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// JSON document
    Json,
    /// Human readable text
    Text,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Text => write!(f, "Text"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" | "txt" => Ok(OutputFormat::Text),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_labels_round_trip_through_from_str() {
        for location in Location::FLOW.iter().chain([Location::PublicYard].iter()) {
            assert_eq!(location.label().parse::<Location>().unwrap(), *location);
        }
    }

    #[test]
    fn test_location_from_str_aliases() {
        assert_eq!("screening".parse::<Location>().unwrap(), Location::Triagem);
        assert_eq!("EM ROTA P/ PC1".parse::<Location>().unwrap(), Location::EnRouteToPc1);
        assert_eq!("patio publico".parse::<Location>().unwrap(), Location::PublicYard);
        assert_eq!("exited".parse::<Location>().unwrap(), Location::Exited);

        // Only defined locations are valid
        assert!("No Terminal".parse::<Location>().is_err());
        assert!("".parse::<Location>().is_err());
    }

    #[test]
    fn test_location_serializes_to_dashboard_label() {
        let json = serde_json::to_string(&Location::EnRouteToTerminal).unwrap();
        assert_eq!(json, "\"Em Rota p/ Terminal\"");
        let json = serde_json::to_string(&Location::PublicYard).unwrap();
        assert_eq!(json, "\"Pátio Público\"");
        assert!(serde_json::from_str::<Location>("\"Garagem\"").is_err());
    }

    #[test]
    fn test_location_predicates() {
        assert!(Location::EnRouteToPc1.is_en_route());
        assert!(Location::EnRouteToTerminal.is_en_route());
        assert!(!Location::Pc1.is_en_route());
        assert!(Location::Exited.is_exited());
        assert!(!Location::PublicYard.is_tracked());
        assert_eq!(Location::Triagem.stage_index(), Some(0));
        assert_eq!(Location::Exited.stage_index(), Some(4));
        assert_eq!(Location::PublicYard.stage_index(), None);
    }

    #[test]
    fn test_vehicle_type_parsing_and_labels() {
        assert_eq!("Serviço".parse::<VehicleType>().unwrap(), VehicleType::Service);
        assert_eq!("servico".parse::<VehicleType>().unwrap(), VehicleType::Service);
        assert_eq!("cegonha".parse::<VehicleType>().unwrap(), VehicleType::Cegonha);
        assert_eq!(VehicleType::Service.to_string(), "Serviço");
        assert!(VehicleType::Cegonha.is_exempt_from_tracking());
        assert!(!VehicleType::Normal.is_exempt_from_tracking());
        assert!("bus".parse::<VehicleType>().is_err());
    }

    #[test]
    fn test_patio_color_serialization() {
        assert_eq!(serde_json::to_string(&PatioColor::Yellow).unwrap(), "\"yellow\"");
        assert_eq!("RED".parse::<PatioColor>().unwrap(), PatioColor::Red);
    }

    #[test]
    fn test_alert_severity_ordering() {
        assert!(AlertSeverity::Danger > AlertSeverity::Warning);
        assert_eq!(AlertSeverity::Danger.to_string(), "danger");
    }

    #[test]
    fn test_record_status_from_str() {
        assert_eq!("No Pátio".parse::<RecordStatus>().unwrap(), RecordStatus::InComplex);
        assert_eq!("saiu".parse::<RecordStatus>().unwrap(), RecordStatus::Exited);
        assert!("todos".parse::<RecordStatus>().is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("csv".parse::<OutputFormat>().is_err());
    }
}
