//! Position Keeper: tracks relative bearing, target angle and the integrated
//! motion of both ships.
//!
//! Range and bearing are taken exactly from the kinematic state every tick.
//! The integrator chain runs alongside so that its accumulated bearing and
//! range change can be inspected and compared against the exact geometry.

use serde::Serialize;

use crate::angles::{knots_to_yps, normalize_signed};
use crate::mechanism::{ComponentReading, Differential, Integrator, Resolver};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeeperInputs {
    pub own_course: f64,
    pub own_speed: f64, // knots
    pub target_course: f64,
    pub target_speed: f64, // knots
    pub bearing: f64,      // deg true
    pub range: f64,        // yards
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct KeeperOutputs {
    pub relative_bearing: f64, // Br, (-180, 180]
    pub target_angle: f64,     // A, (-180, 180]
    pub range: f64,
    pub bearing_change: f64,   // R·dB, yards
    pub range_change: f64,     // dR, yards
    pub generated_range: f64,  // initial range + dR
}

#[derive(Debug, Clone)]
pub struct PositionKeeper {
    diff_7: Differential,
    diff_33: Differential,
    resolver_13: Resolver,
    resolver_34: Resolver,
    int_14: Integrator,
    int_15: Integrator,
    int_35: Integrator,
    int_36: Integrator,
    diff_28: Differential,
    diff_29: Differential,
    initial_range: f64,
    outputs: KeeperOutputs,
}

impl PositionKeeper {
    pub fn new() -> Self {
        Self {
            diff_7: Differential::subtract("diff_7", "Differential 7 (Br = B - Co)"),
            diff_33: Differential::subtract("diff_33", "Differential 33 (A = B + 180 - C)"),
            resolver_13: Resolver::new("resolver_13", "Resolver 13 (Br)"),
            resolver_34: Resolver::new("resolver_34", "Resolver 34 (A)"),
            int_14: Integrator::new("int_14", "Integrator 14 (So sin Br dT)"),
            int_15: Integrator::new("int_15", "Integrator 15 (So cos Br dT)"),
            int_35: Integrator::new("int_35", "Integrator 35 (S sin A dT)"),
            int_36: Integrator::new("int_36", "Integrator 36 (S cos A dT)"),
            diff_28: Differential::add("diff_28", "Differential 28 (R dB)"),
            diff_29: Differential::add("diff_29", "Differential 29 (dR)"),
            initial_range: 0.0,
            outputs: KeeperOutputs::default(),
        }
    }

    /// Zero every integrator and take `range` as the reference for the
    /// generated range.
    pub fn reset(&mut self, range: f64) {
        for int in [&mut self.int_14, &mut self.int_15, &mut self.int_35, &mut self.int_36] {
            int.reset();
        }
        self.diff_28.update(0.0, 0.0);
        self.diff_29.update(0.0, 0.0);
        self.initial_range = if range.is_finite() { range } else { 0.0 };
        self.outputs = KeeperOutputs {
            range: self.initial_range,
            generated_range: self.initial_range,
            ..KeeperOutputs::default()
        };
    }

    pub fn update(&mut self, inputs: &KeeperInputs, dt: f64) -> KeeperOutputs {
        let br = normalize_signed(self.diff_7.update(inputs.bearing, inputs.own_course));
        let a = normalize_signed(self.diff_33.update(inputs.bearing + 180.0, inputs.target_course));

        let (sin_br, cos_br) = self.resolver_13.update(br);
        let (sin_a, cos_a) = self.resolver_34.update(a);

        let so = knots_to_yps(inputs.own_speed);
        let s = knots_to_yps(inputs.target_speed);
        let own_across = self.int_14.update(sin_br, so, dt);
        let own_along = self.int_15.update(cos_br, so, dt);
        let tgt_across = self.int_35.update(sin_a, s, dt);
        let tgt_along = self.int_36.update(cos_a, s, dt);

        let bearing_change = self.diff_28.update(own_across, tgt_across);
        let closing = self.diff_29.update(own_along, tgt_along);

        self.outputs = KeeperOutputs {
            relative_bearing: br,
            target_angle: a,
            range: inputs.range,
            bearing_change,
            range_change: -closing,
            generated_range: self.initial_range - closing,
        };
        self.outputs
    }

    pub fn outputs(&self) -> &KeeperOutputs {
        &self.outputs
    }

    pub fn readings(&self) -> Vec<ComponentReading> {
        vec![
            self.diff_7.reading(),
            self.diff_33.reading(),
            self.resolver_13.reading(),
            self.resolver_34.reading(),
            self.int_14.reading(),
            self.int_15.reading(),
            self.int_35.reading(),
            self.int_36.reading(),
            self.diff_28.reading(),
            self.diff_29.reading(),
        ]
    }
}

impl Default for PositionKeeper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanism::ComponentKind;
    use approx::assert_relative_eq;

    fn inputs(bearing: f64, range: f64) -> KeeperInputs {
        KeeperInputs {
            own_course: 0.0,
            own_speed: 0.0,
            target_course: 270.0,
            target_speed: 10.0,
            bearing,
            range,
        }
    }

    #[test]
    fn relative_bearing_and_target_angle() {
        let mut keeper = PositionKeeper::new();
        keeper.reset(2000.0);
        let out = keeper.update(
            &KeeperInputs { own_course: 350.0, target_course: 120.0, ..inputs(20.0, 2000.0) },
            0.1,
        );
        assert_relative_eq!(out.relative_bearing, 30.0, epsilon = 1e-9);
        assert_relative_eq!(out.target_angle, 80.0, epsilon = 1e-9);
    }

    #[test]
    fn closing_target_shortens_generated_range() {
        // Target dead ahead steaming straight at us: A = 0, closing at S.
        let mut keeper = PositionKeeper::new();
        keeper.reset(3000.0);
        let k = KeeperInputs { target_course: 180.0, ..inputs(0.0, 3000.0) };
        for _ in 0..100 {
            keeper.update(&k, 0.1);
        }
        let expected = 3000.0 - knots_to_yps(10.0) * 10.0;
        assert_relative_eq!(keeper.outputs().generated_range, expected, epsilon = 1e-6);
        assert_relative_eq!(keeper.outputs().bearing_change, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn crossing_target_accumulates_bearing_change() {
        // Target ahead crossing left to right: A = 90 starboard.
        let mut keeper = PositionKeeper::new();
        keeper.reset(3000.0);
        let k = KeeperInputs { target_course: 90.0, ..inputs(0.0, 3000.0) };
        for _ in 0..10 {
            keeper.update(&k, 1.0);
        }
        assert_relative_eq!(keeper.outputs().bearing_change, knots_to_yps(10.0) * 10.0, epsilon = 1e-6);
    }

    #[test]
    fn reset_clears_integrators() {
        let mut keeper = PositionKeeper::new();
        keeper.reset(1000.0);
        keeper.update(&inputs(0.0, 1000.0), 5.0);
        keeper.reset(1500.0);
        let accumulated: Vec<_> = keeper
            .readings()
            .into_iter()
            .filter(|r| r.kind == ComponentKind::Integrator)
            .collect();
        assert_eq!(accumulated.len(), 4);
        assert!(accumulated.iter().all(|r| r.value == 0.0));
        assert_eq!(keeper.outputs().generated_range, 1500.0);
    }
}
