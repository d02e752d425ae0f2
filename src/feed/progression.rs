//! Progression ticker
//!
//! On every tick each open record in the checkpoint flow gets, with a fixed
//! probability, its single next legal transition.

use crate::checkpoint::{Transition, TransitionOutcome};
use crate::error::StoreResult;
use crate::store::EntityStore;
use crate::types::{RecordId, YardConfig};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Moves records forward at random
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressionTicker {
    probability: f64,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Records moved, with the transition applied
    pub advanced: Vec<(RecordId, Transition)>,
    /// Records that stayed put this tick
    pub held: usize,
    /// Transitions that turned out to be no-ops
    pub no_ops: usize,
}

impl TickReport {
    /// Number of records that exited during the tick
    pub fn exits(&self) -> usize {
        self.advanced.iter().filter(|(_, t)| *t == Transition::Exit).count()
    }
}

impl Default for ProgressionTicker {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl ProgressionTicker {
    /// Ticker advancing each record with `probability`
    pub fn new(probability: f64) -> Self {
        Self { probability: probability.clamp(0.0, 1.0) }
    }

    /// Ticker using the configured probability
    pub fn from_config(config: &YardConfig) -> Self {
        Self::new(config.progression_probability)
    }

    /// Chance of a record advancing on a tick
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Run one tick at `at`
    pub fn tick<R: Rng>(
        &self,
        store: &mut EntityStore,
        rng: &mut R,
        at: DateTime<Utc>,
    ) -> StoreResult<TickReport> {
        let candidates: Vec<RecordId> = store
            .access_records()
            .iter()
            .filter(|r| r.is_tracked() && !r.is_closed())
            .map(|r| r.id)
            .collect();

        let mut report = TickReport::default();
        for id in candidates {
            if !rng.gen_bool(self.probability) {
                report.held += 1;
                continue;
            }
            let Some(location) = store.access_record(id).map(|r| r.location) else {
                continue;
            };
            match store.advance_record_at(id, at)? {
                Some(TransitionOutcome::Applied { .. }) => {
                    if let Some(transition) = Transition::next_for(location) {
                        report.advanced.push((id, transition));
                    }
                }
                Some(TransitionOutcome::AlreadyApplied) => report.no_ops += 1,
                None => report.held += 1,
            }
        }

        debug!(
            advanced = report.advanced.len(),
            held = report.held,
            "Progression tick complete"
        );
        Ok(report)
    }
}
