//! Checkpoint state machine
//!
//! # Overview
//!
//! Records move strictly forward through
//! `Triagem → Em Rota p/ PC1 → PC1 → Em Rota p/ Terminal → Saiu`. Car-carriers
//! sit in `Pátio Público` and never move. The [`transition`] module holds the
//! table and its timestamp side effects; this module exposes it as store
//! commands.
//!
//! # Usage Example
//!
//! ```rust
//! use yard_access_monitor::checkpoint::*;
//! use yard_access_monitor::store::*;
//! use yard_access_monitor::types::*;
//!
//! let mut store = EntityStore::new();
//! let id = store
//!     .add_access_record(NewAccessRecord::new("ABC-1234", VehicleType::Normal))
//!     .unwrap()
//!     .id;
//!
//! store.advance_to_pc1_route(id).unwrap();
//! assert!(store.arrive_at_pc1(id).unwrap().is_applied());
//!
//! // Skipping a checkpoint is rejected
//! assert!(store.register_exit(id).is_err());
//! ```

pub mod transition;

pub use transition::*;

use crate::error::{EntityKind, StoreError, StoreResult};
use crate::store::EntityStore;
use crate::types::RecordId;
use chrono::{DateTime, Utc};
use tracing::warn;

impl EntityStore {
    /// Apply a transition to a record at an explicit instant
    ///
    /// Unknown ids are always reported, whatever the not-found policy.
    pub fn apply_transition(
        &mut self,
        id: RecordId,
        transition: Transition,
        at: DateTime<Utc>,
    ) -> StoreResult<TransitionOutcome> {
        let record = self.record_mut(id)?;
        let outcome = apply_to_record(record, transition, at).map_err(|err| {
            warn!(record = %id, %transition, error = %err, "Transition rejected");
            err
        })?;
        if outcome.is_applied() {
            self.touch();
        }
        Ok(outcome)
    }

    /// Triagem → Em Rota p/ PC1, now
    pub fn advance_to_pc1_route(&mut self, id: RecordId) -> StoreResult<TransitionOutcome> {
        self.advance_to_pc1_route_at(id, Utc::now())
    }

    /// Triagem → Em Rota p/ PC1
    pub fn advance_to_pc1_route_at(
        &mut self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> StoreResult<TransitionOutcome> {
        self.apply_transition(id, Transition::AdvanceToPc1Route, at)
    }

    /// Em Rota p/ PC1 → PC1, now
    pub fn arrive_at_pc1(&mut self, id: RecordId) -> StoreResult<TransitionOutcome> {
        self.arrive_at_pc1_at(id, Utc::now())
    }

    /// Em Rota p/ PC1 → PC1
    pub fn arrive_at_pc1_at(
        &mut self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> StoreResult<TransitionOutcome> {
        self.apply_transition(id, Transition::ArriveAtPc1, at)
    }

    /// PC1 → Em Rota p/ Terminal, now
    pub fn advance_to_terminal_route(&mut self, id: RecordId) -> StoreResult<TransitionOutcome> {
        self.advance_to_terminal_route_at(id, Utc::now())
    }

    /// PC1 → Em Rota p/ Terminal
    pub fn advance_to_terminal_route_at(
        &mut self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> StoreResult<TransitionOutcome> {
        self.apply_transition(id, Transition::AdvanceToTerminalRoute, at)
    }

    /// Em Rota p/ Terminal → Saiu, now
    pub fn register_exit(&mut self, id: RecordId) -> StoreResult<TransitionOutcome> {
        self.register_exit_at(id, Utc::now())
    }

    /// Em Rota p/ Terminal → Saiu; closes the record
    pub fn register_exit_at(
        &mut self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> StoreResult<TransitionOutcome> {
        self.apply_transition(id, Transition::Exit, at)
    }

    /// Apply the next legal transition of a record, if it has one
    pub fn advance_record_at(
        &mut self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<TransitionOutcome>> {
        let Some(location) = self.access_record(id).map(|r| r.location) else {
            return Err(StoreError::not_found(EntityKind::AccessRecord, id));
        };
        match Transition::next_for(location) {
            Some(transition) => self.apply_transition(id, transition, at).map(Some),
            None => Ok(None),
        }
    }
}
