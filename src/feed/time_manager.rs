//! Feed clock
//!
//! The feed either runs in simulated time, where waiting is instant and the
//! clock only moves when told to, or in real time, where waiting sleeps.

use crate::error::{FeedError, FeedResult};
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, instrument};

/// Longest single sleep in real-time mode, so a stop request is seen quickly
const MAX_SLEEP_SLICE: std::time::Duration = std::time::Duration::from_millis(200);

/// How the clock advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockMode {
    /// Time only moves through `advance_by` / `wait_until`, instantly
    Simulated,
    /// Wall clock; waiting sleeps the thread
    RealTime,
}

/// Clock shared by the feed's periodic tasks
#[derive(Debug, Clone)]
pub struct TimeManager {
    mode: ClockMode,
    started_at: DateTime<Utc>,
    simulated_now: DateTime<Utc>,
}

impl TimeManager {
    /// Simulated clock starting at `start`
    pub fn simulated(start: DateTime<Utc>) -> Self {
        info!("Initializing simulated clock at {}", start);
        Self { mode: ClockMode::Simulated, started_at: start, simulated_now: start }
    }

    /// Wall clock
    pub fn real_time() -> Self {
        let now = Utc::now();
        info!("Initializing real-time clock");
        Self { mode: ClockMode::RealTime, started_at: now, simulated_now: now }
    }

    /// Clock mode
    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    /// Instant the clock was started at
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Current instant
    pub fn now(&self) -> DateTime<Utc> {
        match self.mode {
            ClockMode::Simulated => self.simulated_now,
            ClockMode::RealTime => Utc::now(),
        }
    }

    /// Time since the clock started
    pub fn elapsed(&self) -> Duration {
        self.now() - self.started_at
    }

    /// Move a simulated clock forward
    ///
    /// Negative durations are rejected. On a real-time clock this sleeps.
    pub fn advance_by(&mut self, duration: Duration) -> FeedResult<()> {
        if duration < Duration::zero() {
            return Err(FeedError::time_error(format!(
                "Cannot move the clock backwards by {}",
                duration
            )));
        }
        let target = self.now() + duration;
        self.wait_until(target, &AtomicBool::new(false))?;
        debug!("Advanced clock by {}", duration);
        Ok(())
    }

    /// Block until `target`, or until `stop` is raised
    ///
    /// Returns `false` when interrupted by the stop flag. A simulated clock
    /// jumps straight to `target` (never backwards).
    #[instrument(skip(self, stop))]
    pub fn wait_until(&mut self, target: DateTime<Utc>, stop: &AtomicBool) -> FeedResult<bool> {
        match self.mode {
            ClockMode::Simulated => {
                if stop.load(Ordering::Relaxed) {
                    return Ok(false);
                }
                self.simulated_now = self.simulated_now.max(target);
                Ok(true)
            }
            ClockMode::RealTime => loop {
                if stop.load(Ordering::Relaxed) {
                    return Ok(false);
                }
                let remaining = target - Utc::now();
                if remaining <= Duration::zero() {
                    return Ok(true);
                }
                let remaining = remaining
                    .to_std()
                    .map_err(|e| FeedError::time_error(format!("Invalid wait: {}", e)))?;
                std::thread::sleep(remaining.min(MAX_SLEEP_SLICE));
            },
        }
    }
}
