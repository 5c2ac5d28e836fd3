//! One-shot rescaling of raw astronomical units into display units.
//!
//! Raw data is in kilometers and days. Each tree depth gets its own radius
//! and distance divisor so that moons stay visible next to planets whose
//! orbits are orders of magnitude larger.

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::kinematics;

/// Default multiplier applied to every period. Larger means slower motion.
pub const TIME_SCALER: f64 = 500.0;

/// Divisors applied to one tree depth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthScale {
    /// Divisor for `radius`.
    pub radius_divisor: f64,
    /// Divisor for `orbital_distance`. Ignored at depth 0.
    pub distance_divisor: f64,
}

impl DepthScale {
    /// Leaves values unchanged.
    pub const IDENTITY: Self = Self {
        radius_divisor: 1.0,
        distance_divisor: 1.0,
    };
}

/// Depth-indexed divisor table. Depths past the end use [`DepthScale::IDENTITY`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleTable {
    levels: Vec<DepthScale>,
}

impl ScaleTable {
    /// Creates a table from per-depth divisors, starting at depth 0.
    pub fn new(levels: Vec<DepthScale>) -> Self {
        Self { levels }
    }

    /// Returns the divisors for `depth`.
    pub fn at(&self, depth: usize) -> DepthScale {
        self.levels
            .get(depth)
            .copied()
            .unwrap_or(DepthScale::IDENTITY)
    }

    /// Number of explicitly configured depths.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` if no depth is configured.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for ScaleTable {
    /// Star, planet and moon divisors for a solar-system-sized view.
    fn default() -> Self {
        Self::new(vec![
            DepthScale {
                radius_divisor: 1e4,
                distance_divisor: 1.0,
            },
            DepthScale {
                radius_divisor: 3e2,
                distance_divisor: 6e5,
            },
            DepthScale {
                radius_divisor: 3e2,
                distance_divisor: 1e4,
            },
        ])
    }
}

/// Rescales the tree rooted at `root` in place and zeroes every angle.
///
/// Pre-order, depth 0 at `root`. Both periods are multiplied by
/// `time_scaler`, and each position is rederived from the scaled distance
/// at angle 0. Never fails: NaN or negative inputs propagate unchanged
/// into the scaled values.
pub fn normalize(root: &mut Body, table: &ScaleTable, time_scaler: f64) {
    normalize_at(root, 0, table, time_scaler);
}

fn normalize_at(body: &mut Body, depth: usize, table: &ScaleTable, time_scaler: f64) {
    let scale = table.at(depth);

    body.orbital_angle = 0.0;
    body.rotational_angle = 0.0;

    body.radius /= scale.radius_divisor;
    if depth >= 1 {
        body.orbital_distance /= scale.distance_divisor;
    }

    body.orbital_period *= time_scaler;
    body.rotational_period *= time_scaler;
    kinematics::place(body);

    for child in &mut body.children {
        normalize_at(child, depth + 1, table, time_scaler);
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;

    fn solar() -> Body {
        Body::new("Sun", 0.0, 0.0, 25.0, 695_700.0).with_child(
            Body::new("Earth", 1.496e8, 365.25, 1.0, 6371.0)
                .with_child(Body::new("Moon", 384_400.0, 27.3, 27.3, 1737.0)),
        )
    }

    #[test]
    fn test_default_table_divisors() {
        let mut root = solar();
        normalize(&mut root, &ScaleTable::default(), TIME_SCALER);

        assert!((root.radius - 69.57).abs() < 1e-9);
        assert_eq!(root.orbital_distance, 0.0);

        let earth = &root.children[0];
        assert!((earth.radius - 6371.0 / 300.0).abs() < 1e-9);
        assert!((earth.orbital_distance - 1.496e8 / 6e5).abs() < 1e-9);
        assert!((earth.orbital_period - 365.25 * 500.0).abs() < 1e-9);

        let moon = &earth.children[0];
        assert!((moon.orbital_distance - 38.44).abs() < 1e-9);
        assert!((moon.rotational_period - 27.3 * 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_positions_follow_scaled_distance() {
        let mut root = solar();
        root.children[0].position = DVec3::new(-1.0, 2.0, 3.0);
        normalize(&mut root, &ScaleTable::default(), TIME_SCALER);

        assert_eq!(root.position, DVec3::ZERO);
        let earth = &root.children[0];
        assert_eq!(earth.position, DVec3::new(earth.orbital_distance, 0.0, 0.0));
        let moon = &earth.children[0];
        assert!((moon.position.x - 38.44).abs() < 1e-9);
        assert_eq!(moon.position.y, 0.0);
    }

    #[test]
    fn test_normalize_always_resets_angles() {
        let mut root = solar();
        root.orbital_angle = 3.0;
        root.children[0].rotational_angle = -7.5;
        root.children[0].children[0].orbital_angle = 100.0;

        normalize(&mut root, &ScaleTable::default(), 1.0);

        assert_eq!(root.orbital_angle, 0.0);
        assert_eq!(root.children[0].rotational_angle, 0.0);
        assert_eq!(root.children[0].children[0].orbital_angle, 0.0);
    }

    #[test]
    fn test_depth_beyond_table_uses_identity() {
        let mut root = Body::new("Star", 0.0, 0.0, 0.0, 10.0).with_child(
            Body::new("Planet", 100.0, 1.0, 1.0, 10.0).with_child(
                Body::new("Moon", 100.0, 1.0, 1.0, 10.0)
                    .with_child(Body::new("Moonlet", 42.0, 2.0, 0.0, 3.0)),
            ),
        );
        let table = ScaleTable::new(vec![DepthScale {
            radius_divisor: 2.0,
            distance_divisor: 2.0,
        }]);

        normalize(&mut root, &table, 1.0);

        assert_eq!(root.radius, 5.0);
        let moonlet = &root.children[0].children[0].children[0];
        assert_eq!(moonlet.orbital_distance, 42.0);
        assert_eq!(moonlet.radius, 3.0);
        assert_eq!(moonlet.orbital_period, 2.0);
    }

    #[test]
    fn test_table_lookup() {
        let table = ScaleTable::default();
        assert_eq!(table.len(), 3);
        assert_eq!(table.at(1).distance_divisor, 6e5);
        assert_eq!(table.at(9), DepthScale::IDENTITY);
        assert!(ScaleTable::new(Vec::new()).is_empty());
    }
}
