//! The celestial body node.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// One node of the orbital hierarchy (star, planet or moon).
///
/// Deserializes from the camelCase data-file layout. `position` is derived
/// state and is never read from or written to the data file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    /// Display name. Not required to be unique.
    pub name: String,
    /// Distance from the parent's origin. 0 for the root.
    #[serde(default)]
    pub orbital_distance: f64,
    /// Time for one full orbit around the parent. 0 means the body does not orbit.
    #[serde(default)]
    pub orbital_period: f64,
    /// Current orbital phase in radians. Accumulates without wrapping.
    #[serde(default)]
    pub orbital_angle: f64,
    /// Time for one self-rotation. Negative for retrograde, 0 for no rotation.
    #[serde(default)]
    pub rotational_period: f64,
    /// Current rotational phase in radians. Accumulates without wrapping.
    #[serde(default)]
    pub rotational_angle: f64,
    /// Display radius.
    #[serde(default)]
    pub radius: f64,
    /// Position in the parent's local frame. `z` is always 0.
    #[serde(skip)]
    pub position: DVec3,
    /// Child bodies in traversal and draw order.
    #[serde(default)]
    pub children: Vec<Body>,
}

impl Body {
    /// Creates a childless body with zeroed angles.
    pub fn new(
        name: impl Into<String>,
        orbital_distance: f64,
        orbital_period: f64,
        rotational_period: f64,
        radius: f64,
    ) -> Self {
        Self {
            name: name.into(),
            orbital_distance,
            orbital_period,
            orbital_angle: 0.0,
            rotational_period,
            rotational_angle: 0.0,
            radius,
            position: DVec3::ZERO,
            children: Vec::new(),
        }
    }

    /// Builder-style helper that appends a child and returns `self`.
    pub fn with_child(mut self, child: Body) -> Self {
        self.children.push(child);
        self
    }

    /// Number of bodies in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Body::subtree_len).sum::<usize>()
    }
}
