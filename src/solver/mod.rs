//! Angle solver: hunts for the gyro angle that balances equations XVII and
//! XVIII, driving the gyro shaft through a follow-up servo.

pub mod latch;
pub mod linkage;
pub mod servo;

pub use latch::SolutionLatch;
pub use linkage::{Balance, Linkage, SolverInputs};
pub use servo::{GyroServo, InertialServo};

use log::debug;
use serde::Serialize;

use crate::angles::{normalize_signed, Side};
use crate::config::{SolverTuning, TdcConfig};
use crate::mechanism::ComponentReading;

/// Gyro angle stops (deg either side of the bow).
pub const GYRO_LIMIT: f64 = 90.0;

/// Relative bearings this close to 180 count as dead astern.
const ASTERN_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SolverOutputs {
    pub balance: Balance,
    pub rate: f64,  // deg/s
    pub slope: f64, // dE18/dG, yards per degree
    pub solved: bool,
}

pub struct AngleSolver {
    linkage: Linkage,
    servo: Box<dyn GyroServo>,
    latch: SolutionLatch,
    tuning: SolverTuning,
    gyro: f64,
    outputs: SolverOutputs,
}

impl AngleSolver {
    pub fn new(config: &TdcConfig) -> Self {
        Self::with_servo(config, Box::new(InertialServo::new(&config.tuning)))
    }

    pub fn with_servo(config: &TdcConfig, servo: Box<dyn GyroServo>) -> Self {
        Self {
            linkage: Linkage::new(&config.torpedo),
            servo,
            latch: SolutionLatch::new(),
            tuning: config.tuning.clone(),
            gyro: 0.0,
            outputs: SolverOutputs::default(),
        }
    }

    /// Start a new problem: gyro set to the relative bearing (within the
    /// stops), servo stopped, flag cleared.
    pub fn seed(&mut self, inputs: &SolverInputs) {
        self.gyro = seed_angle(inputs);
        self.servo.halt();
        self.latch.reset();
        let balance = self.linkage.engage(self.gyro, inputs);
        self.outputs = SolverOutputs { balance, rate: 0.0, slope: 0.0, solved: false };
        debug!("solver seeded at G = {:.2}", self.gyro);
    }

    pub fn update(&mut self, inputs: &SolverInputs, dt: f64) -> SolverOutputs {
        if !self.gyro.is_finite() || !self.servo.rate().is_finite() {
            debug!("solver reseeded from non-finite state");
            self.gyro = seed_angle(inputs);
            self.servo.halt();
        }

        let delta = self.tuning.probe_delta_deg;
        let here = self.linkage.evaluate(self.gyro, inputs);
        let above = self.linkage.evaluate(self.gyro + delta, inputs);
        let below = self.linkage.evaluate(self.gyro - delta, inputs);
        let slope = (above.error_18 - below.error_18) / (2.0 * delta);

        let correction = self.correction(&here, slope, inputs);
        let rate = self.servo.drive(correction, self.latch.solved(), dt);
        self.gyro += rate * dt;
        if self.gyro > GYRO_LIMIT || self.gyro < -GYRO_LIMIT {
            self.gyro = clamp_gyro(self.gyro);
            if rate * self.gyro > 0.0 {
                self.servo.halt();
            }
        }

        let balance = self.linkage.engage(self.gyro, inputs);
        let thresholds = self.tuning.thresholds(inputs.range);
        if let Some(solved) = self.latch.update(balance.error_18, balance.is_valid(), thresholds) {
            debug!(
                "{} at G = {:.2} (E18 = {:.1} yd, R = {:.0} yd)",
                if solved { "solution" } else { "solution lost" },
                self.gyro,
                balance.error_18,
                inputs.range
            );
        }

        self.outputs = SolverOutputs {
            balance,
            rate: self.servo.rate(),
            slope,
            solved: self.latch.solved(),
        };
        self.outputs
    }

    /// Gyro correction (deg) from the balance at the present angle and the
    /// local slope of Error XVIII.
    fn correction(&self, here: &Balance, slope: f64, inputs: &SolverInputs) -> f64 {
        if here.wrong_branch {
            normalize_signed(inputs.relative_bearing - self.gyro)
        } else if slope.abs() > self.tuning.min_slope {
            -here.error_18 / slope
        } else {
            let range = inputs.range.abs().max(self.tuning.fallback_range);
            -here.error_18 / (range * std::f64::consts::PI / 180.0)
        }
    }

    pub fn gyro(&self) -> f64 {
        self.gyro
    }

    pub fn outputs(&self) -> &SolverOutputs {
        &self.outputs
    }

    pub fn servo_name(&self) -> &str {
        self.servo.name()
    }

    pub fn readings(&self) -> Vec<ComponentReading> {
        self.linkage.readings()
    }
}

fn clamp_gyro(angle: f64) -> f64 {
    normalize_signed(angle).clamp(-GYRO_LIMIT, GYRO_LIMIT)
}

/// Starting gyro angle for a problem. Dead astern the bearing gives no side,
/// so the gyro goes to the stop on the side the target is heading for.
fn seed_angle(inputs: &SolverInputs) -> f64 {
    let br = normalize_signed(inputs.relative_bearing);
    if 180.0 - br.abs() > ASTERN_TOLERANCE {
        return clamp_gyro(br);
    }
    match Side::of(-inputs.target_angle) {
        Side::Starboard => GYRO_LIMIT,
        Side::Port => -GYRO_LIMIT,
    }
}
