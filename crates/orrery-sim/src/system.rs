//! Body tree ownership, loading and load-time validation.

use std::path::Path;

use glam::DVec3;
use serde::Deserialize;
use tracing::{debug, info};

use crate::body::Body;
use crate::kinematics;
use crate::scale::{self, ScaleTable};

/// Errors that can occur while loading a system description.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Failed to read the data file from disk.
    #[error("failed to read system data: {0}")]
    Read(#[source] std::io::Error),

    /// The data is not a valid system document.
    #[error("failed to parse system data: {0}")]
    Parse(#[source] serde_json::Error),

    /// A numeric field holds a value the simulation cannot give meaning to.
    #[error("body `{body}` has degenerate {field}: {value}")]
    DegenerateInput {
        /// Name of the offending body.
        body: String,
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Top-level layout of the data file: `{ "root": { ... } }`.
#[derive(Deserialize)]
struct SystemDocument {
    root: Body,
}

/// A rooted celestial hierarchy together with its normalization state.
#[derive(Clone, Debug, PartialEq)]
pub struct System {
    root: Body,
    normalized: bool,
}

impl System {
    /// Wraps an already-built tree and derives every position from the
    /// current distances and angles. The tree is not validated.
    pub fn new(mut root: Body) -> Self {
        kinematics::place_tree(&mut root);
        Self {
            root,
            normalized: false,
        }
    }

    /// Parses and validates a JSON system document.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let doc: SystemDocument = serde_json::from_str(json).map_err(LoadError::Parse)?;
        validate(&doc.root, true)?;
        Ok(Self::new(doc.root))
    }

    /// Loads and validates a JSON system document from disk.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path).map_err(LoadError::Read)?;
        let system = Self::from_json(&contents)?;
        info!(
            "Loaded system `{}` ({} bodies) from {}",
            system.root.name,
            system.len(),
            path.display()
        );
        Ok(system)
    }

    /// Rescales the tree and zeroes all angles.
    ///
    /// Only the first call has an effect; later calls return `false` so a
    /// tree is never scaled twice.
    pub fn normalize(&mut self, table: &ScaleTable, time_scaler: f64) -> bool {
        if self.normalized {
            debug!("System already normalized, skipping");
            return false;
        }
        scale::normalize(&mut self.root, table, time_scaler);
        self.normalized = true;
        true
    }

    /// Returns `true` once [`normalize`](Self::normalize) has run.
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Advances every body by `delta_time` at the given playback multiplier.
    pub fn advance(&mut self, delta_time: f64, time_multiplier: f64) {
        kinematics::advance(&mut self.root, delta_time, time_multiplier);
    }

    /// The root body.
    pub fn root(&self) -> &Body {
        &self.root
    }

    /// Total number of bodies.
    pub fn len(&self) -> usize {
        self.root.subtree_len()
    }

    /// Always `false`: a system has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Pre-order traversal yielding `(depth, body)`.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            stack: vec![(0, &self.root)],
        }
    }

    /// First body named `name` in pre-order.
    pub fn find(&self, name: &str) -> Option<&Body> {
        self.iter().map(|(_, body)| body).find(|body| body.name == name)
    }

    /// World-space position of the parent of the first body named `name`,
    /// i.e. the centre of that body's orbit. The root's orbit centre is the origin.
    pub fn orbit_center(&self, name: &str) -> Option<DVec3> {
        locate(&self.root, name, DVec3::ZERO).map(|(center, _)| center)
    }

    /// World-space position of the first body named `name`, composed from the
    /// parent-relative positions along its path from the root.
    pub fn world_position(&self, name: &str) -> Option<DVec3> {
        locate(&self.root, name, DVec3::ZERO).map(|(center, body)| center + body.position)
    }
}

/// Pre-order iterator over a [`System`].
pub struct PreOrder<'a> {
    stack: Vec<(usize, &'a Body)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (usize, &'a Body);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, body) = self.stack.pop()?;
        self.stack
            .extend(body.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, body))
    }
}

fn locate<'a>(body: &'a Body, name: &str, center: DVec3) -> Option<(DVec3, &'a Body)> {
    if body.name == name {
        return Some((center, body));
    }
    let here = center + body.position;
    body.children
        .iter()
        .find_map(|child| locate(child, name, here))
}

/// Rejects values the kinematics cannot handle meaningfully.
///
/// Only the root may have a zero orbital period, and it must sit at distance
/// 0. A zero rotational period is valid anywhere, and a negative one encodes
/// retrograde rotation.
fn validate(body: &Body, is_root: bool) -> Result<(), LoadError> {
    let degenerate = |field: &'static str, value: f64| LoadError::DegenerateInput {
        body: body.name.clone(),
        field,
        value,
    };

    let non_negative = [
        ("orbitalDistance", body.orbital_distance),
        ("orbitalPeriod", body.orbital_period),
        ("radius", body.radius),
    ];
    for (field, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(degenerate(field, value));
        }
    }

    let finite = [
        ("rotationalPeriod", body.rotational_period),
        ("orbitalAngle", body.orbital_angle),
        ("rotationalAngle", body.rotational_angle),
    ];
    for (field, value) in finite {
        if !value.is_finite() {
            return Err(degenerate(field, value));
        }
    }

    if is_root && body.orbital_distance != 0.0 {
        return Err(degenerate("orbitalDistance", body.orbital_distance));
    }
    if !is_root && body.orbital_period == 0.0 {
        return Err(degenerate("orbitalPeriod", body.orbital_period));
    }

    body.children
        .iter()
        .try_for_each(|child| validate(child, false))
}
