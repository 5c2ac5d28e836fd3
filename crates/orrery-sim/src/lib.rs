//! Hierarchical orbit simulation for Orrery.
//!
//! A [`System`] owns a tree of [`Body`] nodes (star, planets, moons). The tree
//! is rescaled once by [`normalize`], then advanced every tick by
//! [`advance`] (usually through a [`SimClock`]). The [`transfer`] module
//! finds constant-speed transfer times between two orbiting bodies.

mod body;
mod clock;
mod itinerary;
mod kinematics;
mod scale;
mod system;
pub mod transfer;

pub use body::Body;
pub use clock::SimClock;
pub use itinerary::{Itinerary, Leg, PlanError, TransferSettings, plan};
pub use kinematics::advance;
pub use scale::{DepthScale, ScaleTable, TIME_SCALER, normalize};
pub use system::{LoadError, PreOrder, System};
pub use transfer::{OrbitalState, TransferError, TransferProblem, solve};
