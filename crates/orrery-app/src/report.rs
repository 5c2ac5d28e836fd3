//! Plain-text reports of body state and itinerary legs.

use std::fmt::Write;

use orrery_sim::{Leg, System};

/// One line per body in pre-order, indented by depth, with the parent-relative
/// position and the rotational angle.
pub fn bodies(system: &System) -> String {
    let mut out = String::new();
    for (depth, body) in system.iter() {
        let p = body.position;
        let _ = writeln!(
            out,
            "{:indent$}{:<12} pos=({:>10.3}, {:>10.3}, {:>4.1}) rot={:>9.4} r={:.3}",
            "",
            body.name,
            p.x,
            p.y,
            p.z,
            body.rotational_angle,
            body.radius,
            indent = depth * 2,
        );
    }
    out
}

/// One line per leg plus a total.
pub fn legs(legs: &[Leg]) -> String {
    let mut out = String::new();
    for leg in legs {
        let _ = writeln!(
            out,
            "{} -> {}: depart {:.3} ms, transfer {:.3} ms",
            leg.from, leg.to, leg.departure, leg.duration
        );
    }
    let total: f64 = legs.iter().map(|leg| leg.duration).sum();
    let _ = writeln!(out, "total: {total:.3} ms over {} legs", legs.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_sim::Body;

    #[test]
    fn test_bodies_are_indented_by_depth() {
        let system = System::new(
            Body::new("Sun", 0.0, 0.0, 0.0, 1.0)
                .with_child(Body::new("Earth", 10.0, 0.0, 0.0, 1.0)),
        );
        let text = bodies(&system);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Sun"));
        assert!(lines[1].starts_with("  Earth"));
        assert!(lines[1].contains("10.000"));
    }

    #[test]
    fn test_legs_total() {
        let text = legs(&[
            Leg {
                from: "A".into(),
                to: "B".into(),
                departure: 0.0,
                duration: 1.5,
            },
            Leg {
                from: "B".into(),
                to: "C".into(),
                departure: 1.5,
                duration: 2.0,
            },
        ]);
        assert!(text.contains("A -> B"));
        assert!(text.ends_with("total: 3.500 ms over 2 legs\n"));
    }
}
