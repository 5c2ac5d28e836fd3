//! Tick loops driving a [`System`] through a [`SimClock`].
//!
//! Fixed mode advances by a constant delta and is fully deterministic.
//! Real-time mode paces ticks at the configured frame rate and feeds the
//! measured wall-clock deltas to the clock, like an animation frame loop.

use std::time::{Duration, Instant};

use orrery_sim::{SimClock, System};
use tracing::{debug, warn};

/// How ticks are timed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickMode {
    /// Every tick advances by this many milliseconds.
    Fixed { tick_ms: f64 },
    /// Ticks are paced at this rate and advance by the measured delta.
    Realtime { frame_rate: u32 },
}

/// Totals for a finished run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    /// Ticks executed.
    pub ticks: u64,
    /// Simulated milliseconds, before the playback multiplier.
    pub elapsed_ms: f64,
}

/// Runs `ticks` ticks on `system`.
pub fn run(system: &mut System, clock: &mut SimClock, mode: TickMode, ticks: u32) -> RunSummary {
    match mode {
        TickMode::Fixed { tick_ms } => {
            for _ in 0..ticks {
                clock.step(system, tick_ms);
            }
        }
        TickMode::Realtime { frame_rate } => {
            let frame = Duration::from_secs_f64(1.0 / f64::from(frame_rate.max(1)));
            clock.reset();
            let frame_ms = frame.as_secs_f64() * 1000.0;
            let mut next_frame = Instant::now() + frame;
            for _ in 0..ticks {
                std::thread::sleep(next_frame.saturating_duration_since(Instant::now()));
                next_frame += frame;

                let delta = clock.tick(system);
                if delta > frame_ms * 4.0 {
                    warn!("Tick took {delta:.1}ms, expected {frame_ms:.1}ms");
                }
                debug!(delta_ms = delta, "tick");
            }
        }
    }

    RunSummary {
        ticks: clock.tick_count(),
        elapsed_ms: clock.elapsed_ms(),
    }
}
