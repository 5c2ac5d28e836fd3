//! Constant-speed transfer times between orbiting bodies.
//!
//! A particle leaves the source's current position at speed `v` on a straight
//! line. The target keeps moving along its circular orbit. The transfer time
//! `T` is a root of the miss function
//!
//! ```text
//! f(T) = v * T - |source_point - target_point_at(T)|
//! ```
//!
//! found by bisection on a caller-supplied bracket. The source is held fixed
//! at its departure angle for the whole transfer.

use glam::DVec2;
use tracing::{debug, trace};

use crate::kinematics;
use crate::system::System;

/// Errors reported by the transfer solver.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransferError {
    /// `a > b`, or `f(a)` and `f(b)` do not have strictly opposite signs.
    #[error("invalid bracket [{a}, {b}]: f(a) = {fa}, f(b) = {fb}")]
    InvalidBracket {
        /// Lower end of the rejected bracket.
        a: f64,
        /// Upper end of the rejected bracket.
        b: f64,
        /// Miss function at `a`.
        fa: f64,
        /// Miss function at `b`.
        fb: f64,
    },

    /// The iteration cap was reached before the bracket shrank below tolerance.
    #[error("no convergence after {iterations} iterations, bracket narrowed to [{a}, {b}]")]
    NotConverged {
        /// Iterations performed.
        iterations: u32,
        /// Lower end of the final bracket.
        a: f64,
        /// Upper end of the final bracket.
        b: f64,
    },

    /// Speed, tolerance or bracket ends are not usable numbers.
    #[error("invalid solver parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Circular motion of a point about a fixed centre, in the plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitalState {
    /// Centre of the orbit.
    pub center: DVec2,
    /// Orbital radius.
    pub radius: f64,
    /// Phase angle at `t = 0`, in radians.
    pub angle: f64,
    /// Phase rate in radians per time unit.
    pub angular_velocity: f64,
}

impl OrbitalState {
    /// A point that never moves.
    pub fn fixed(point: DVec2) -> Self {
        Self {
            center: point,
            radius: 0.0,
            angle: 0.0,
            angular_velocity: 0.0,
        }
    }

    /// Captures the current orbit of the first body named `name`.
    ///
    /// The centre is the parent's world position, taken as fixed. Angular
    /// velocity is in radians per millisecond of wall-clock time at the given
    /// playback multiplier, matching the units the clock advances with.
    pub fn of(system: &System, name: &str, time_multiplier: f64) -> Option<Self> {
        let body = system.find(name)?;
        let center = system.orbit_center(name)?;
        Some(Self {
            center: center.truncate(),
            radius: body.orbital_distance,
            angle: body.orbital_angle,
            angular_velocity: kinematics::angular_velocity(body.orbital_period, time_multiplier),
        })
    }

    /// Position after `t` time units.
    pub fn point_at(&self, t: f64) -> DVec2 {
        let (sin, cos) = (self.angle + self.angular_velocity * t).sin_cos();
        self.center + self.radius * DVec2::new(cos, sin)
    }
}

/// A source, a moving target and a transfer speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransferProblem {
    /// Departure orbit. Only its `t = 0` point is used.
    pub source: OrbitalState,
    /// Arrival orbit, moving at its angular velocity.
    pub target: OrbitalState,
    /// Travel speed in distance per time unit.
    pub speed: f64,
}

impl TransferProblem {
    /// Creates a new problem.
    pub fn new(source: OrbitalState, target: OrbitalState, speed: f64) -> Self {
        Self {
            source,
            target,
            speed,
        }
    }

    /// The miss function `f(T)`. Non-negative once the particle could have
    /// covered the distance to the target's position at `T`.
    pub fn miss(&self, t: f64) -> f64 {
        let departure = self.source.point_at(0.0);
        self.speed * t - departure.distance(self.target.point_at(t))
    }

    /// A bracket `[0, b]` with `f(b) > 0` whenever the source and target
    /// are not both degenerate points at the same location.
    ///
    /// The distance between the two points never exceeds the centre distance
    /// plus both radii, so travelling slightly longer than that at `speed`
    /// always overshoots.
    pub fn auto_bracket(&self) -> (f64, f64) {
        let reach = self.source.center.distance(self.target.center)
            + self.source.radius.abs()
            + self.target.radius.abs();
        (0.0, reach / self.speed * (1.0 + 1e-3))
    }

    /// Bisection on `bracket` until the half-width drops below `tolerance`.
    pub fn solve(
        &self,
        bracket: (f64, f64),
        tolerance: f64,
        max_iterations: u32,
    ) -> Result<f64, TransferError> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(TransferError::InvalidParameter("speed must be positive and finite"));
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(TransferError::InvalidParameter("tolerance must be positive and finite"));
        }
        let (mut a, mut b) = bracket;
        if a.is_nan() || b.is_nan() {
            return Err(TransferError::InvalidParameter("bracket ends must not be NaN"));
        }

        let mut fa = self.miss(a);
        let fb = self.miss(b);
        let opposite = (fa < 0.0 && fb > 0.0) || (fa > 0.0 && fb < 0.0);
        if a > b || !opposite {
            return Err(TransferError::InvalidBracket { a, b, fa, fb });
        }

        for iteration in 1..=max_iterations {
            let c = (a + b) / 2.0;
            let fc = self.miss(c);
            trace!(iteration, a, b, c, fc, "bisection step");

            if fc == 0.0 || (b - a) / 2.0 < tolerance {
                debug!(iterations = iteration, time = c, "transfer solved");
                return Ok(c);
            }

            if (fc < 0.0) == (fa < 0.0) {
                a = c;
                fa = fc;
            } else {
                b = c;
            }
        }

        Err(TransferError::NotConverged {
            iterations: max_iterations,
            a,
            b,
        })
    }

    /// Solves on [`auto_bracket`](Self::auto_bracket).
    ///
    /// Returns 0 when the target already sits at the departure point.
    pub fn solve_auto(&self, tolerance: f64, max_iterations: u32) -> Result<f64, TransferError> {
        if self.miss(0.0) == 0.0 {
            return Ok(0.0);
        }
        self.solve(self.auto_bracket(), tolerance, max_iterations)
    }
}

/// Finds `T` in `bracket` such that a particle leaving `source` now at `speed`
/// reaches `target` exactly at time `T`.
pub fn solve(
    source: &OrbitalState,
    target: &OrbitalState,
    speed: f64,
    bracket: (f64, f64),
    tolerance: f64,
    max_iterations: u32,
) -> Result<f64, TransferError> {
    TransferProblem::new(*source, *target, speed).solve(bracket, tolerance, max_iterations)
}
