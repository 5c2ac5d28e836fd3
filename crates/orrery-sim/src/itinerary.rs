//! Multi-stop travel plans built from consecutive transfers.

use glam::DVec2;
use tracing::info;

use crate::system::System;
use crate::transfer::{OrbitalState, TransferError, TransferProblem};

/// Solver settings shared by every leg of a plan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransferSettings {
    /// Travel speed in display distance per millisecond.
    pub speed: f64,
    /// Bisection half-width stopping threshold.
    pub tolerance: f64,
    /// Bisection iteration cap.
    pub max_iterations: u32,
    /// Playback multiplier the target orbits are evaluated at.
    pub time_multiplier: f64,
}

/// Ordered list of body names to visit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Itinerary {
    steps: Vec<String>,
}

impl Itinerary {
    /// Creates an itinerary from body names.
    pub fn new<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends a stop.
    pub fn push(&mut self, name: impl Into<String>) {
        self.steps.push(name.into());
    }

    /// Removes and returns the stop at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.steps.len()).then(|| self.steps.remove(index))
    }

    /// The stops in order.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }
}

/// One solved leg of an itinerary.
#[derive(Clone, Debug, PartialEq)]
pub struct Leg {
    /// Departure body.
    pub from: String,
    /// Arrival body.
    pub to: String,
    /// Simulation time at departure, relative to the start of the plan.
    pub departure: f64,
    /// Transfer duration.
    pub duration: f64,
}

/// Errors that can occur while planning an itinerary.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A stop names a body that is not in the system.
    #[error("unknown body: {0}")]
    UnknownBody(String),

    /// The solver failed on one leg.
    #[error("transfer {from} -> {to} failed: {source}")]
    Transfer {
        /// Departure body.
        from: String,
        /// Arrival body.
        to: String,
        /// Underlying solver error.
        #[source]
        source: TransferError,
    },
}

/// Solves every consecutive leg of `itinerary`.
///
/// Each leg departs when the previous one arrives: a copy of `system` is
/// advanced by every leg's duration before the next leg is solved, so the
/// input system is left untouched. Later legs depart from the point where
/// the previous leg met its target, which for a moon differs from the moon's
/// position after the advance since its parent has moved on. Fewer than two
/// stops yield no legs.
pub fn plan(
    system: &System,
    itinerary: &Itinerary,
    settings: &TransferSettings,
) -> Result<Vec<Leg>, PlanError> {
    if let Some(unknown) = itinerary
        .steps()
        .iter()
        .find(|name| system.find(name).is_none())
    {
        return Err(PlanError::UnknownBody(unknown.clone()));
    }

    let mut sim = system.clone();
    let mut clock = 0.0;
    let mut arrival: Option<DVec2> = None;
    let mut legs = Vec::with_capacity(itinerary.steps().len().saturating_sub(1));

    for pair in itinerary.steps().windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let state = |name: &str| {
            OrbitalState::of(&sim, name, settings.time_multiplier)
                .ok_or_else(|| PlanError::UnknownBody(name.to_string()))
        };
        let source = match arrival {
            Some(point) => OrbitalState::fixed(point),
            None => state(from)?,
        };
        let target = state(to)?;
        let problem = TransferProblem::new(source, target, settings.speed);

        let duration = problem
            .solve_auto(settings.tolerance, settings.max_iterations)
            .map_err(|source| PlanError::Transfer {
                from: from.clone(),
                to: to.clone(),
                source,
            })?;

        info!("Leg {from} -> {to}: departs at {clock:.3}, takes {duration:.3}");
        legs.push(Leg {
            from: from.clone(),
            to: to.clone(),
            departure: clock,
            duration,
        });

        arrival = Some(target.point_at(duration));
        sim.advance(duration, settings.time_multiplier);
        clock += duration;
    }

    Ok(legs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;

    fn settings() -> TransferSettings {
        TransferSettings {
            speed: 0.5,
            tolerance: 1e-9,
            max_iterations: 200,
            time_multiplier: 1.0,
        }
    }

    fn system() -> System {
        System::new(
            Body::new("Sun", 0.0, 0.0, 0.0, 1.0)
                .with_child(Body::new("Inner", 50.0, 0.0, 0.0, 1.0))
                .with_child(Body::new("Outer", 80.0, 2000.0, 0.0, 1.0))
                .with_child(Body::new("Far", 120.0, 0.0, 0.0, 1.0)),
        )
    }

    #[test]
    fn test_plan_static_legs() {
        let sys = system();
        let legs = plan(&sys, &Itinerary::new(["Inner", "Far"]), &settings()).unwrap();
        assert_eq!(legs.len(), 1);
        // Both bodies sit on the +x axis, 70 apart.
        assert!((legs[0].duration - 140.0).abs() < 1e-6);
        assert_eq!(legs[0].departure, 0.0);
    }

    #[test]
    fn test_legs_chain_departure_times() {
        let sys = system();
        let legs = plan(
            &sys,
            &Itinerary::new(["Inner", "Outer", "Far"]),
            &settings(),
        )
        .unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[1].from, "Outer");
        assert!((legs[1].departure - legs[0].duration).abs() < 1e-12);

        // Arrival point of the first leg lies on Outer's orbit.
        let outer = OrbitalState::of(&sys, "Outer", 1.0).unwrap();
        let arrival = outer.point_at(legs[0].duration);
        let start = OrbitalState::of(&sys, "Inner", 1.0).unwrap().point_at(0.0);
        assert!((start.distance(arrival) - 0.5 * legs[0].duration).abs() < 1e-6);
    }

    #[test]
    fn test_next_leg_departs_from_arrival_point() {
        let sys = System::new(
            Body::new("Sun", 0.0, 0.0, 0.0, 1.0)
                .with_child(Body::new("Outer", 80.0, 2000.0, 0.0, 1.0))
                .with_child(
                    Body::new("Planet", 40.0, 900.0, 0.0, 1.0)
                        .with_child(Body::new("Moon", 10.0, 150.0, 0.0, 1.0)),
                ),
        );
        let legs = plan(
            &sys,
            &Itinerary::new(["Outer", "Moon", "Outer"]),
            &settings(),
        )
        .unwrap();
        assert_eq!(legs.len(), 2);

        let met = OrbitalState::of(&sys, "Moon", 1.0)
            .unwrap()
            .point_at(legs[0].duration);

        let mut later = sys.clone();
        later.advance(legs[0].duration, 1.0);
        let outer = OrbitalState::of(&later, "Outer", 1.0).unwrap();
        let reached = outer.point_at(legs[1].duration);
        assert!((met.distance(reached) - 0.5 * legs[1].duration).abs() < 1e-6);

        // The moon's own position after the advance is elsewhere: its parent moved.
        let moon_now = OrbitalState::of(&later, "Moon", 1.0).unwrap().point_at(0.0);
        assert!(moon_now.distance(met) > 1e-3);
    }

    #[test]
    fn test_plan_leaves_system_untouched() {
        let sys = system();
        let before = sys.clone();
        plan(&sys, &Itinerary::new(["Inner", "Outer"]), &settings()).unwrap();
        assert_eq!(sys, before);
    }

    #[test]
    fn test_unknown_body() {
        let result = plan(&system(), &Itinerary::new(["Inner", "Pluto"]), &settings());
        assert!(matches!(result, Err(PlanError::UnknownBody(name)) if name == "Pluto"));
    }

    #[test]
    fn test_short_itinerary_has_no_legs() {
        assert!(plan(&system(), &Itinerary::default(), &settings())
            .unwrap()
            .is_empty());
        assert!(plan(&system(), &Itinerary::new(["Sun"]), &settings())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_solver_failure_is_wrapped() {
        let bad = TransferSettings {
            speed: 0.0,
            ..settings()
        };
        let result = plan(&system(), &Itinerary::new(["Inner", "Far"]), &bad);
        assert!(matches!(
            result,
            Err(PlanError::Transfer {
                source: TransferError::InvalidParameter(_),
                ..
            })
        ));
    }

    #[test]
    fn test_itinerary_edit() {
        let mut itinerary = Itinerary::new(["Sun"]);
        itinerary.push("Far");
        assert_eq!(itinerary.steps(), ["Sun", "Far"]);
        assert_eq!(itinerary.remove(0).as_deref(), Some("Sun"));
        assert_eq!(itinerary.remove(5), None);
        assert_eq!(itinerary.steps().len(), 1);
    }
}
