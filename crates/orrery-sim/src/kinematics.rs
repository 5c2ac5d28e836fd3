//! Per-tick advance of orbital and rotational angles.

use std::f64::consts::TAU;

use glam::DVec3;

use crate::body::Body;

/// Advances every body in the subtree by `delta_time`, scaled by `time_multiplier`.
///
/// Angles accumulate: two calls with `d1` and `d2` produce the same angles as
/// one call with `d1 + d2`. A zero period pins the matching angle at 0.
/// Positions are recomputed in the parent's frame on the `z = 0` plane.
pub fn advance(body: &mut Body, delta_time: f64, time_multiplier: f64) {
    body.rotational_angle = step_angle(
        body.rotational_angle,
        body.rotational_period,
        delta_time,
        time_multiplier,
    );
    body.orbital_angle = step_angle(
        body.orbital_angle,
        body.orbital_period,
        delta_time,
        time_multiplier,
    );

    place(body);

    for child in &mut body.children {
        advance(child, delta_time, time_multiplier);
    }
}

/// Recomputes `position` for every body in the subtree from its current
/// distance and angle, without advancing time.
pub(crate) fn place_tree(body: &mut Body) {
    place(body);
    for child in &mut body.children {
        place_tree(child);
    }
}

/// Parent-relative position on the `z = 0` plane.
pub(crate) fn place(body: &mut Body) {
    let (sin, cos) = body.orbital_angle.sin_cos();
    body.position = DVec3::new(
        body.orbital_distance * cos,
        body.orbital_distance * sin,
        0.0,
    );
}

/// Angular velocity in radians per time unit for a period, 0 for a zero period.
pub(crate) fn angular_velocity(period: f64, time_multiplier: f64) -> f64 {
    if period == 0.0 {
        0.0
    } else {
        TAU * time_multiplier / period
    }
}

fn step_angle(angle: f64, period: f64, delta_time: f64, time_multiplier: f64) -> f64 {
    if period == 0.0 {
        0.0
    } else {
        angle + delta_time / period * TAU * time_multiplier
    }
}
