//! Wall-clock driven simulation ticks.
//!
//! The clock owns the playback multiplier and the instant of the previous
//! tick. Each tick advances the [`System`] by the elapsed milliseconds, so
//! irregular frame times accumulate exactly.

use std::time::Instant;

use tracing::warn;

use crate::system::System;

/// Playback clock for a [`System`].
#[derive(Debug, Clone)]
pub struct SimClock {
    previous_time: Instant,
    time_multiplier: f64,
    tick_count: u64,
    elapsed_ms: f64,
}

impl SimClock {
    /// Creates a clock starting now with a multiplier of 1.
    pub fn new() -> Self {
        Self::with_multiplier(1.0)
    }

    /// Creates a clock starting now with the given multiplier.
    ///
    /// Invalid multipliers fall back to 1.
    pub fn with_multiplier(time_multiplier: f64) -> Self {
        let mut clock = Self {
            previous_time: Instant::now(),
            time_multiplier: 1.0,
            tick_count: 0,
            elapsed_ms: 0.0,
        };
        clock.set_time_multiplier(time_multiplier);
        clock
    }

    /// Current playback multiplier.
    pub fn time_multiplier(&self) -> f64 {
        self.time_multiplier
    }

    /// Changes the playback multiplier.
    ///
    /// Returns `false` and keeps the current value if `multiplier` is negative
    /// or not finite. Zero pauses the simulation.
    pub fn set_time_multiplier(&mut self, multiplier: f64) -> bool {
        if !multiplier.is_finite() || multiplier < 0.0 {
            warn!("Ignoring invalid time multiplier {multiplier}");
            return false;
        }
        self.time_multiplier = multiplier;
        true
    }

    /// Advances `system` by the wall-clock time since the previous tick.
    /// Returns the delta in milliseconds.
    pub fn tick(&mut self, system: &mut System) -> f64 {
        self.tick_at(system, Instant::now())
    }

    /// Advances `system` by the time between the previous tick and `now`.
    ///
    /// An instant earlier than the previous tick yields a zero delta.
    pub fn tick_at(&mut self, system: &mut System, now: Instant) -> f64 {
        let delta_ms = now.saturating_duration_since(self.previous_time).as_secs_f64() * 1000.0;
        self.previous_time = now;
        self.step(system, delta_ms);
        delta_ms
    }

    /// Advances `system` by an explicit delta in milliseconds.
    pub fn step(&mut self, system: &mut System, delta_ms: f64) {
        system.advance(delta_ms, self.time_multiplier);
        self.tick_count += 1;
        self.elapsed_ms += delta_ms;
    }

    /// Restarts delta measurement from now without advancing anything.
    pub fn reset(&mut self) {
        self.previous_time = Instant::now();
    }

    /// Number of ticks or steps taken.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Sum of all deltas passed to the system, in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}
