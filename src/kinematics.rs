use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::angles::{heading_vector, knots_to_yps, normalize_degrees};

/// Below this separation the bearing is undefined and the last one is kept.
const MIN_SEPARATION: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Operator inputs
// ---------------------------------------------------------------------------

/// Values set on the computer's input dials.
///
/// Nothing here is validated. A negative range places the target on the
/// reciprocal bearing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TdcInputs {
    pub own_course: f64,     // deg true
    pub own_speed: f64,      // knots
    pub target_bearing: f64, // deg true
    pub target_range: f64,   // yards
    pub target_course: f64,  // deg true
    pub target_speed: f64,   // knots
}

impl Default for TdcInputs {
    fn default() -> Self {
        Self {
            own_course: 0.0,
            own_speed: 0.0,
            target_bearing: 0.0,
            target_range: 1000.0,
            target_course: 180.0,
            target_speed: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Ships
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub position: Vector2<f64>, // yards, x = East, y = North
    pub course: f64,            // deg true
    pub speed: f64,             // knots
}

impl Platform {
    pub fn new(position: Vector2<f64>, course: f64, speed: f64) -> Self {
        Self { position, course, speed }
    }

    /// Velocity in yards per second.
    pub fn velocity(&self) -> Vector2<f64> {
        let (east, north) = heading_vector(self.course);
        Vector2::new(east, north) * knots_to_yps(self.speed)
    }

    fn advance(&mut self, dt: f64) {
        let next = self.position + self.velocity() * dt;
        if next.iter().all(|c| c.is_finite()) {
            self.position = next;
        }
    }
}

/// Exact present bearing and range from own ship to target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometry {
    pub range: f64,   // yards, >= 0
    pub bearing: f64, // deg true, [0, 360)
}

// ---------------------------------------------------------------------------
// Kinematic state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct KinematicState {
    pub own: Platform,
    pub target: Platform,
    last_bearing: f64,
}

impl KinematicState {
    /// Own ship at the origin, target placed from the bearing/range inputs.
    pub fn from_inputs(inputs: &TdcInputs) -> Self {
        let mut state = Self {
            own: Platform::new(Vector2::zeros(), inputs.own_course, inputs.own_speed),
            target: Platform::new(Vector2::zeros(), inputs.target_course, inputs.target_speed),
            last_bearing: normalize_degrees(inputs.target_bearing),
        };
        state.apply_inputs(inputs);
        state
    }

    /// Take a fresh observation: courses and speeds are replaced, own ship
    /// goes back to the origin and the target is re-placed from it.
    pub fn apply_inputs(&mut self, inputs: &TdcInputs) {
        self.own.course = inputs.own_course;
        self.own.speed = inputs.own_speed;
        self.target.course = inputs.target_course;
        self.target.speed = inputs.target_speed;

        let (east, north) = heading_vector(inputs.target_bearing);
        let offset = Vector2::new(east, north) * inputs.target_range;
        if offset.iter().all(|c| c.is_finite()) {
            self.own.position = Vector2::zeros();
            self.target.position = offset;
        }
        if inputs.target_bearing.is_finite() {
            self.last_bearing = normalize_degrees(if inputs.target_range < 0.0 {
                inputs.target_bearing + 180.0
            } else {
                inputs.target_bearing
            });
        }
    }

    /// Move both ships along their courses.
    pub fn advance(&mut self, dt: f64) {
        self.own.advance(dt);
        self.target.advance(dt);
    }

    pub fn geometry(&mut self) -> Geometry {
        let d = self.target.position - self.own.position;
        let range = d.x.hypot(d.y);
        if range > MIN_SEPARATION {
            self.last_bearing = normalize_degrees(d.x.atan2(d.y).to_degrees());
        }
        Geometry { range, bearing: self.last_bearing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn places_target_from_bearing_and_range() {
        let inputs = TdcInputs { target_bearing: 45.0, target_range: 2000.0, ..Default::default() };
        let mut state = KinematicState::from_inputs(&inputs);
        let g = state.geometry();
        assert_relative_eq!(g.range, 2000.0, epsilon = 1e-9);
        assert_relative_eq!(g.bearing, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn negative_range_is_reciprocal_bearing() {
        let inputs = TdcInputs { target_bearing: 30.0, target_range: -1500.0, ..Default::default() };
        let mut state = KinematicState::from_inputs(&inputs);
        let g = state.geometry();
        assert_relative_eq!(g.range, 1500.0, epsilon = 1e-9);
        assert_relative_eq!(g.bearing, 210.0, epsilon = 1e-9);
    }

    #[test]
    fn ships_move_along_course() {
        let inputs = TdcInputs {
            own_course: 90.0,
            own_speed: 10.0,
            target_bearing: 0.0,
            target_range: 3000.0,
            target_course: 180.0,
            target_speed: 10.0,
        };
        let mut state = KinematicState::from_inputs(&inputs);
        state.advance(60.0);
        let run = knots_to_yps(10.0) * 60.0;
        assert_relative_eq!(state.own.position.x, run, epsilon = 1e-6);
        assert_relative_eq!(state.target.position.y, 3000.0 - run, epsilon = 1e-6);
    }

    #[test]
    fn huge_separation_has_finite_range() {
        let inputs = TdcInputs { target_bearing: 45.0, target_range: 1e200, ..Default::default() };
        let mut state = KinematicState::from_inputs(&inputs);
        let g = state.geometry();
        assert_relative_eq!(g.range, 1e200, max_relative = 1e-12);
        assert_relative_eq!(g.bearing, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn new_inputs_replace_target_from_own_ship() {
        let inputs = TdcInputs { own_speed: 20.0, target_bearing: 0.0, target_range: 2000.0, ..Default::default() };
        let mut state = KinematicState::from_inputs(&inputs);
        state.advance(600.0);
        state.apply_inputs(&TdcInputs { target_bearing: 90.0, target_range: 1500.0, ..inputs });
        let g = state.geometry();
        assert_relative_eq!(g.range, 1500.0, epsilon = 1e-9);
        assert_relative_eq!(g.bearing, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_range_keeps_last_bearing() {
        let inputs = TdcInputs { target_bearing: 120.0, target_range: 0.0, ..Default::default() };
        let mut state = KinematicState::from_inputs(&inputs);
        let g = state.geometry();
        assert_eq!(g.range, 0.0);
        assert_eq!(g.bearing, 120.0);
    }
}
