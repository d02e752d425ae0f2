//! Feed orchestrator
//!
//! Schedules the three periodic feed tasks (arrivals, progression, alert
//! evaluation) on one clock. Each task first fires one interval after the
//! start. When several tasks fall due on the same instant they run in that
//! order.

use crate::error::{ErrorHandler, FeedResult};
use crate::feed::{ArrivalGenerator, FeedStatistics, ProgressionTicker, TickReport, TimeManager};
use crate::store::{EntityStore, SharedStore};
use crate::timing::{Alert, AlertMonitor, AlertThresholds};
use crate::types::{RecordId, YardConfig};
use crate::yard_event;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Drives the simulation feed against a shared store
#[derive(Debug)]
pub struct FeedOrchestrator {
    /// Configuration for the run
    config: YardConfig,
    /// Store written by the feed
    store: SharedStore,
    /// Simulated or wall clock
    clock: TimeManager,
    /// Arrival synthesizer
    generator: ArrivalGenerator,
    /// Progression ticker
    ticker: ProgressionTicker,
    /// Latest alert set
    monitor: AlertMonitor,
    /// Random number generator with optional seed
    rng: StdRng,
    /// Error handler for graceful error recovery
    error_handler: ErrorHandler,
    /// Counters for the run
    statistics: FeedStatistics,
    /// Raised to stop a running feed
    stop: Arc<AtomicBool>,
}

impl FeedOrchestrator {
    /// Orchestrator with a fresh store and the clock the configuration asks for
    #[instrument(skip(config), fields(duration_minutes = config.duration_minutes, realtime = config.realtime))]
    pub fn new(config: YardConfig) -> FeedResult<Self> {
        let clock =
            if config.realtime { TimeManager::real_time() } else { TimeManager::simulated(Utc::now()) };
        Self::with_clock(config, clock)
    }

    /// Orchestrator on an explicit clock
    pub fn with_clock(config: YardConfig, clock: TimeManager) -> FeedResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => {
                info!("Using deterministic seed: {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => {
                debug!("Using entropy-based random seed");
                StdRng::from_entropy()
            }
        };

        Ok(Self {
            store: SharedStore::new(EntityStore::with_policy(config.not_found_policy)),
            generator: ArrivalGenerator::from_config(&config),
            ticker: ProgressionTicker::from_config(&config),
            monitor: AlertMonitor::new(AlertThresholds::from(&config)),
            rng,
            error_handler: ErrorHandler::new(),
            statistics: FeedStatistics::new(),
            stop: Arc::new(AtomicBool::new(false)),
            clock,
            config,
        })
    }

    /// Write into an existing store instead of a fresh one
    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = store;
        self
    }

    /// Use a different error handler
    pub fn with_error_handler(mut self, error_handler: ErrorHandler) -> Self {
        self.error_handler = error_handler;
        self
    }

    /// Store the feed writes into
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Feed clock
    pub fn clock(&self) -> &TimeManager {
        &self.clock
    }

    /// Current instant on the feed clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Counters so far
    pub fn statistics(&self) -> &FeedStatistics {
        &self.statistics
    }

    /// Alerts from the latest evaluation
    pub fn alerts(&self) -> &[Alert] {
        self.monitor.current()
    }

    /// Flag that stops the run when raised
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run for the configured duration
    pub fn run(&mut self) -> FeedResult<FeedStatistics> {
        let duration = self.config.run_duration();
        self.run_for(duration)
    }

    /// Run on a background thread; the store handle stays readable meanwhile
    pub fn spawn(mut self) -> JoinHandle<FeedResult<FeedStatistics>> {
        std::thread::spawn(move || self.run())
    }

    /// Run every task that falls due within `duration` from now
    #[instrument(skip(self))]
    pub fn run_for(&mut self, duration: Duration) -> FeedResult<FeedStatistics> {
        let arrival_every = Duration::seconds(self.config.arrival_interval_secs as i64);
        let progression_every = Duration::seconds(self.config.progression_interval_secs as i64);
        let alert_every = Duration::seconds(self.config.alert_interval_secs as i64);

        let wall_start = Instant::now();
        let start = self.clock.now();
        let end = start + duration;
        if self.statistics.started_at.is_none() {
            self.statistics.started_at = Some(start);
        }

        info!(
            "Starting {:?} feed run covering {} minutes",
            self.clock.mode(),
            duration.num_minutes()
        );

        let mut next_arrival = start + arrival_every;
        let mut next_progression = start + progression_every;
        let mut next_alert = start + alert_every;

        loop {
            let next = next_arrival.min(next_progression).min(next_alert);
            if next > end {
                break;
            }
            if !self.clock.wait_until(next, &self.stop)? {
                info!("Stop requested, ending feed run early");
                break;
            }
            let at = self.clock.now();

            if next_arrival <= next {
                self.guarded("arrival", |feed| feed.arrival_step(at))?;
                next_arrival += arrival_every;
            }
            if next_progression <= next {
                self.guarded("progression", |feed| feed.progression_step(at))?;
                next_progression += progression_every;
            }
            if next_alert <= next {
                self.guarded("alert evaluation", |feed| feed.alert_step(at))?;
                next_alert += alert_every;
            }
        }

        if !self.stop.load(Ordering::Relaxed) {
            self.clock.wait_until(end, &self.stop)?;
        }
        self.statistics.finished_at = Some(self.clock.now());
        self.statistics.wall_clock += wall_start.elapsed();

        info!("Feed run complete: {}", self.statistics);
        Ok(self.statistics.clone())
    }

    /// Synthesize one arrival at `at`
    pub fn arrival_step(&mut self, at: DateTime<Utc>) -> FeedResult<RecordId> {
        let record = self
            .store
            .write(|store| self.generator.register(store, &mut self.rng, at))?;
        self.statistics.record_arrival(record.vehicle_type);
        yard_event!(
            debug,
            "Vehicle arrived",
            record = record.id.value(),
            plate = record.plate.as_str(),
            location = record.location.label()
        );
        Ok(record.id)
    }

    /// Run one progression tick at `at`
    pub fn progression_step(&mut self, at: DateTime<Utc>) -> FeedResult<TickReport> {
        let report = self
            .store
            .write(|store| self.ticker.tick(store, &mut self.rng, at))?;

        self.statistics.progression_ticks += 1;
        self.statistics.transitions_applied += report.advanced.len();
        self.statistics.no_op_transitions += report.no_ops;
        self.statistics.records_held += report.held;
        self.statistics.exits += report.exits();
        Ok(report)
    }

    /// Re-evaluate alerts at `at`
    pub fn alert_step(&mut self, at: DateTime<Utc>) -> FeedResult<usize> {
        let count = self
            .store
            .read(|store| self.monitor.refresh(store.access_records(), at).len());
        self.statistics.record_alert_evaluation(count);
        if count > 0 {
            yard_event!(info, "Alerts active", count = count);
        }
        Ok(count)
    }

    fn guarded<T>(
        &mut self,
        context: &str,
        operation: impl FnOnce(&mut Self) -> FeedResult<T>,
    ) -> FeedResult<Option<T>> {
        let handler = self.error_handler.clone();
        let outcome = handler.execute(context, || operation(self))?;
        if outcome.is_none() {
            self.statistics.skipped_operations += 1;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FeedError, StoreError};
    use crate::types::{Location, VehicleType};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    fn seeded_config(seed: u64) -> YardConfig {
        YardConfig { seed: Some(seed), duration_minutes: 10, ..YardConfig::default() }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = YardConfig { arrival_interval_secs: 0, ..YardConfig::default() };
        let err = FeedOrchestrator::with_clock(config, TimeManager::simulated(t0())).unwrap_err();
        assert!(matches!(err, FeedError::ConfigValidation(_)));
    }

    #[test]
    fn test_simulated_run_schedules_each_task() {
        let mut feed =
            FeedOrchestrator::with_clock(seeded_config(7), TimeManager::simulated(t0())).unwrap();
        let stats = feed.run().unwrap();

        // 600 s of simulated time: arrivals every 5 s, ticks every 7 s, alerts every 10 s
        assert_eq!(stats.total_arrivals(), 120);
        assert_eq!(stats.progression_ticks, 85);
        assert_eq!(stats.alert_evaluations, 60);
        assert_eq!(stats.simulated_span(), Duration::minutes(10));
        assert_eq!(feed.now(), t0() + Duration::minutes(10));
        assert_eq!(feed.store().read(|s| s.access_records().len()), 120);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let run = |seed| {
            let mut feed =
                FeedOrchestrator::with_clock(seeded_config(seed), TimeManager::simulated(t0())).unwrap();
            feed.run().unwrap();
            feed.store().snapshot().access_records
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_run_keeps_record_invariants() {
        let mut feed =
            FeedOrchestrator::with_clock(seeded_config(3), TimeManager::simulated(t0())).unwrap();
        feed.run().unwrap();
        for record in feed.store().snapshot().access_records {
            assert_eq!(record.is_closed(), record.location == Location::Exited);
            assert_eq!(
                record.vehicle_type == VehicleType::Cegonha,
                record.location == Location::PublicYard
            );
            record.validate_stage_order().unwrap();
        }
    }

    #[test]
    fn test_stop_flag_ends_run_early() {
        let mut feed =
            FeedOrchestrator::with_clock(seeded_config(1), TimeManager::simulated(t0())).unwrap();
        feed.stop_handle().store(true, Ordering::Relaxed);
        let stats = feed.run().unwrap();
        assert_eq!(stats.total_arrivals(), 0);
        assert_eq!(feed.now(), t0());
    }

    #[test]
    fn test_error_handler_decides_skip_or_abort() {
        let failing = |_: &mut FeedOrchestrator| -> FeedResult<()> {
            Err(StoreError::RecordClosed(RecordId(1)).into())
        };

        let mut lenient =
            FeedOrchestrator::with_clock(seeded_config(2), TimeManager::simulated(t0())).unwrap();
        assert_eq!(lenient.guarded("progression", failing).unwrap(), None);
        assert_eq!(lenient.statistics().skipped_operations, 1);

        let mut strict = FeedOrchestrator::with_clock(seeded_config(2), TimeManager::simulated(t0()))
            .unwrap()
            .with_error_handler(ErrorHandler::strict());
        let err = strict.guarded("progression", failing).unwrap_err();
        assert!(matches!(err, FeedError::Store(StoreError::RecordClosed(_))));
        assert_eq!(strict.statistics().skipped_operations, 0);

        // Healthy runs are unaffected by the strict handler
        let stats = strict.run().unwrap();
        assert_eq!(stats.total_arrivals(), 120);
        assert_eq!(stats.skipped_operations, 0);
    }

    #[test]
    fn test_manual_steps() {
        let mut feed =
            FeedOrchestrator::with_clock(seeded_config(9), TimeManager::simulated(t0())).unwrap();
        let id = feed.arrival_step(t0()).unwrap();
        assert!(feed.store().read(|s| s.access_record(id).is_some()));
        feed.progression_step(t0() + Duration::seconds(7)).unwrap();
        feed.alert_step(t0() + Duration::seconds(10)).unwrap();
        assert_eq!(feed.statistics().alert_evaluations, 1);
        assert_eq!(feed.statistics().progression_ticks, 1);
    }
}
