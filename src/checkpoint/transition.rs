//! Checkpoint transition table
//!
//! | From                | Transition               | To                  | Stamps                     |
//! |---------------------|--------------------------|---------------------|----------------------------|
//! | Triagem             | `AdvanceToPc1Route`      | Em Rota p/ PC1      | patio entry (if unset)     |
//! | Em Rota p/ PC1      | `ArriveAtPc1`            | PC1                 | PC1 entry, patio exit      |
//! | PC1                 | `AdvanceToTerminalRoute` | Em Rota p/ Terminal | PC1 exit                   |
//! | Em Rota p/ Terminal | `Exit`                   | Saiu                | exit (closes the record)   |
//!
//! New stamps never precede the latest stamp already on the record; an
//! earlier instant is clamped forward to it.

use crate::error::{StoreError, StoreResult};
use crate::store::AccessRecord;
use crate::types::Location;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A forward move between two adjacent checkpoint states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Triagem → Em Rota p/ PC1
    AdvanceToPc1Route,
    /// Em Rota p/ PC1 → PC1
    ArriveAtPc1,
    /// PC1 → Em Rota p/ Terminal
    AdvanceToTerminalRoute,
    /// Em Rota p/ Terminal → Saiu
    Exit,
}

impl Transition {
    /// All transitions in flow order
    pub const ALL: [Transition; 4] = [
        Transition::AdvanceToPc1Route,
        Transition::ArriveAtPc1,
        Transition::AdvanceToTerminalRoute,
        Transition::Exit,
    ];

    /// Location the transition starts from
    pub fn source(&self) -> Location {
        match self {
            Transition::AdvanceToPc1Route => Location::Triagem,
            Transition::ArriveAtPc1 => Location::EnRouteToPc1,
            Transition::AdvanceToTerminalRoute => Location::Pc1,
            Transition::Exit => Location::EnRouteToTerminal,
        }
    }

    /// Location the transition leads to
    pub fn target(&self) -> Location {
        match self {
            Transition::AdvanceToPc1Route => Location::EnRouteToPc1,
            Transition::ArriveAtPc1 => Location::Pc1,
            Transition::AdvanceToTerminalRoute => Location::EnRouteToTerminal,
            Transition::Exit => Location::Exited,
        }
    }

    /// The single legal transition out of a location, if any
    pub fn next_for(location: Location) -> Option<Transition> {
        Self::ALL.into_iter().find(|t| t.source() == location)
    }

    /// Human readable action name
    pub fn label(&self) -> &'static str {
        match self {
            Transition::AdvanceToPc1Route => "advance to PC1 route",
            Transition::ArriveAtPc1 => "arrive at PC1",
            Transition::AdvanceToTerminalRoute => "advance to terminal route",
            Transition::Exit => "exit",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of a transition command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionOutcome {
    /// The record moved
    Applied {
        /// Location before the move
        from: Location,
        /// Location after the move
        to: Location,
        /// Instant stamped on the record (after clamping)
        at: DateTime<Utc>,
    },
    /// The record already was in the target location; nothing changed
    AlreadyApplied,
}

impl TransitionOutcome {
    /// Whether the record changed
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied { .. })
    }
}

/// Apply a transition to a record in place
///
/// On error the record is left untouched.
pub fn apply_to_record(
    record: &mut AccessRecord,
    transition: Transition,
    at: DateTime<Utc>,
) -> StoreResult<TransitionOutcome> {
    if record.location == transition.target() {
        return Ok(TransitionOutcome::AlreadyApplied);
    }
    if record.is_closed() {
        return Err(StoreError::RecordClosed(record.id));
    }
    if record.location != transition.source() {
        return Err(StoreError::InvalidTransition {
            record: record.id,
            current: record.location,
            attempted: transition,
        });
    }

    let at = at.max(record.latest_stage_timestamp());
    let from = record.location;

    match transition {
        Transition::AdvanceToPc1Route => {
            record.patio_entry_timestamp.get_or_insert(at);
        }
        Transition::ArriveAtPc1 => {
            record.pc1_entry_timestamp = Some(at);
            record.patio_exit_timestamp = Some(at);
        }
        Transition::AdvanceToTerminalRoute => {
            record.pc1_exit_timestamp = Some(at);
        }
        Transition::Exit => {
            record.exit_timestamp = Some(at);
        }
    }
    record.location = transition.target();

    debug!(record = %record.id, plate = %record.plate, from = %from, to = %record.location, "Transition applied");
    Ok(TransitionOutcome::Applied { from, to: record.location, at })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewAccessRecord;
    use crate::types::{RecordId, VehicleType};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    fn record(vehicle_type: VehicleType) -> AccessRecord {
        NewAccessRecord::new("ABC-1234", vehicle_type).into_record(RecordId(1), t0()).unwrap()
    }

    #[test]
    fn test_next_for_each_location() {
        assert_eq!(Transition::next_for(Location::Triagem), Some(Transition::AdvanceToPc1Route));
        assert_eq!(Transition::next_for(Location::EnRouteToPc1), Some(Transition::ArriveAtPc1));
        assert_eq!(Transition::next_for(Location::Pc1), Some(Transition::AdvanceToTerminalRoute));
        assert_eq!(Transition::next_for(Location::EnRouteToTerminal), Some(Transition::Exit));
        assert_eq!(Transition::next_for(Location::Exited), None);
        assert_eq!(Transition::next_for(Location::PublicYard), None);
    }

    #[test]
    fn test_full_progression_stamps_each_stage() {
        let mut record = record(VehicleType::Normal);
        let mut at = t0();
        for transition in Transition::ALL {
            at += Duration::minutes(2);
            let outcome = apply_to_record(&mut record, transition, at).unwrap();
            assert!(outcome.is_applied());
            assert_eq!(record.location, transition.target());
        }

        assert_eq!(record.patio_entry_timestamp, Some(t0() + Duration::minutes(2)));
        assert_eq!(record.pc1_entry_timestamp, Some(t0() + Duration::minutes(4)));
        assert_eq!(record.patio_exit_timestamp, Some(t0() + Duration::minutes(4)));
        assert_eq!(record.pc1_exit_timestamp, Some(t0() + Duration::minutes(6)));
        assert_eq!(record.exit_timestamp, Some(t0() + Duration::minutes(8)));
        assert!(record.is_closed());
        record.validate_stage_order().unwrap();
    }

    #[test]
    fn test_skipping_a_stage_is_rejected_without_change() {
        let mut record = record(VehicleType::Normal);
        let before = record.clone();
        let err = apply_to_record(&mut record, Transition::ArriveAtPc1, t0()).unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidTransition {
                record: RecordId(1),
                current: Location::Triagem,
                attempted: Transition::ArriveAtPc1,
            }
        );
        assert_eq!(record, before);
    }

    #[test]
    fn test_repeated_transition_is_a_no_op() {
        let mut record = record(VehicleType::Normal);
        apply_to_record(&mut record, Transition::AdvanceToPc1Route, t0()).unwrap();
        let before = record.clone();
        let outcome =
            apply_to_record(&mut record, Transition::AdvanceToPc1Route, t0() + Duration::hours(1))
                .unwrap();
        assert_eq!(outcome, TransitionOutcome::AlreadyApplied);
        assert_eq!(record, before);
    }

    #[test]
    fn test_closed_record_rejects_other_transitions() {
        let mut record = record(VehicleType::Normal);
        for transition in Transition::ALL {
            apply_to_record(&mut record, transition, t0()).unwrap();
        }
        assert_eq!(
            apply_to_record(&mut record, Transition::Exit, t0()).unwrap(),
            TransitionOutcome::AlreadyApplied
        );
        let err = apply_to_record(&mut record, Transition::AdvanceToPc1Route, t0()).unwrap_err();
        assert_eq!(err, StoreError::RecordClosed(RecordId(1)));
    }

    #[test]
    fn test_public_yard_accepts_nothing() {
        let mut record = record(VehicleType::Cegonha);
        for transition in Transition::ALL {
            let err = apply_to_record(&mut record, transition, t0()).unwrap_err();
            assert!(matches!(err, StoreError::InvalidTransition { current: Location::PublicYard, .. }));
        }
    }

    #[test]
    fn test_earlier_instant_is_clamped_forward() {
        let mut record = record(VehicleType::Normal);
        apply_to_record(&mut record, Transition::AdvanceToPc1Route, t0() + Duration::minutes(10))
            .unwrap();
        let outcome =
            apply_to_record(&mut record, Transition::ArriveAtPc1, t0() + Duration::minutes(3)).unwrap();
        assert_eq!(
            outcome,
            TransitionOutcome::Applied {
                from: Location::EnRouteToPc1,
                to: Location::Pc1,
                at: t0() + Duration::minutes(10),
            }
        );
        record.validate_stage_order().unwrap();
    }

    #[test]
    fn test_existing_patio_entry_is_kept() {
        let mut record = NewAccessRecord::new("ABC-1234", VehicleType::Normal)
            .into_record(RecordId(1), t0())
            .unwrap();
        record.patio_entry_timestamp = Some(t0() + Duration::minutes(1));
        apply_to_record(&mut record, Transition::AdvanceToPc1Route, t0() + Duration::minutes(5))
            .unwrap();
        assert_eq!(record.patio_entry_timestamp, Some(t0() + Duration::minutes(1)));
    }
}
