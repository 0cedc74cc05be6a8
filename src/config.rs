use serde::{Deserialize, Serialize};

use crate::angles::knots_to_yps;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Torpedo characteristics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorpedoSpec {
    pub name: String,
    pub speed_knots: f64,
    pub reach_yards: f64,      // straight run before the gyro takes over
    pub turn_rate_deg_s: f64,
    pub max_run_yards: f64,
}

impl TorpedoSpec {
    /// Mark 14, high-speed setting.
    pub fn mark14_high() -> Self {
        Self {
            name: "Mark 14 (high speed)".into(),
            speed_knots: 46.0,
            reach_yards: 75.0,
            turn_rate_deg_s: 4.0,
            max_run_yards: 4_500.0,
        }
    }

    /// Mark 14, low-speed setting.
    pub fn mark14_low() -> Self {
        Self {
            name: "Mark 14 (low speed)".into(),
            speed_knots: 31.5,
            max_run_yards: 9_000.0,
            ..Self::mark14_high()
        }
    }

    /// Mark 18 electric.
    pub fn mark18() -> Self {
        Self {
            name: "Mark 18".into(),
            speed_knots: 29.0,
            max_run_yards: 4_000.0,
            ..Self::mark14_high()
        }
    }

    pub fn speed_yps(&self) -> f64 {
        knots_to_yps(self.speed_knots)
    }

    /// Turn radius from v = ω r (yards).
    pub fn turn_radius(&self) -> f64 {
        self.speed_yps() / self.turn_rate_deg_s.to_radians()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("speed_knots", self.speed_knots),
            ("turn_rate_deg_s", self.turn_rate_deg_s),
            ("max_run_yards", self.max_run_yards),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidTorpedo { field, value });
            }
        }
        if !(self.reach_yards.is_finite() && self.reach_yards >= 0.0) {
            return Err(ConfigError::InvalidTorpedo {
                field: "reach_yards",
                value: self.reach_yards,
            });
        }
        Ok(())
    }
}

impl Default for TorpedoSpec {
    fn default() -> Self {
        Self::mark14_high()
    }
}

// ---------------------------------------------------------------------------
// Angle solver tuning
// ---------------------------------------------------------------------------

/// Solve / unsolve residual limits (yards) for one range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub solve: f64,
    pub unsolve: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverTuning {
    pub probe_delta_deg: f64,  // finite-difference half width
    pub min_slope: f64,        // yards per degree below which Newton is abandoned
    pub response_time: f64,    // s, time over which a correction is commanded
    pub max_rate: f64,         // deg/s, follow-up motor top speed
    pub inertia: f64,          // s, servo momentum time constant
    pub tracking_gain: f64,    // gain while solved
    pub solve_fraction: f64,   // solve threshold as a fraction of range
    pub solve_floor: f64,      // yards, minimum solve threshold
    pub unsolve_factor: f64,   // unsolve threshold / solve threshold
    pub fallback_range: f64,   // yards, minimum range used by the proportional step
}

impl SolverTuning {
    pub fn thresholds(&self, range: f64) -> Thresholds {
        let solve = (self.solve_fraction * range.abs()).max(self.solve_floor);
        Thresholds { solve, unsolve: solve * self.unsolve_factor }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("probe_delta_deg", self.probe_delta_deg),
            ("min_slope", self.min_slope),
            ("response_time", self.response_time),
            ("max_rate", self.max_rate),
            ("tracking_gain", self.tracking_gain),
            ("solve_fraction", self.solve_fraction),
            ("solve_floor", self.solve_floor),
            ("fallback_range", self.fallback_range),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidTuning { field, value });
            }
        }
        if !(self.inertia.is_finite() && self.inertia >= 0.0) {
            return Err(ConfigError::InvalidTuning { field: "inertia", value: self.inertia });
        }
        if !(self.unsolve_factor.is_finite() && self.unsolve_factor >= 1.0) {
            return Err(ConfigError::InvalidTuning {
                field: "unsolve_factor",
                value: self.unsolve_factor,
            });
        }
        Ok(())
    }
}

impl Default for SolverTuning {
    fn default() -> Self {
        Self {
            probe_delta_deg: 0.5,
            min_slope: 1e-3,
            response_time: 0.5,
            max_rate: 15.0,
            inertia: 0.25,
            tracking_gain: 0.25,
            solve_fraction: 0.005,
            solve_floor: 5.0,
            unsolve_factor: 10.0,
            fallback_range: 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TdcConfig {
    pub step: f64,                  // fixed tick, s
    pub max_ticks_per_call: usize,  // elapsed time beyond this is dropped
    pub torpedo: TorpedoSpec,
    pub tuning: SolverTuning,
}

impl TdcConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ConfigError::InvalidStep(self.step));
        }
        if self.max_ticks_per_call == 0 {
            return Err(ConfigError::NoTicksPerCall);
        }
        self.torpedo.validate()?;
        self.tuning.validate()
    }
}

impl Default for TdcConfig {
    fn default() -> Self {
        Self {
            step: 0.1,                // 10 Hz
            max_ticks_per_call: 600,  // one minute of catch-up
            torpedo: TorpedoSpec::default(),
            tuning: SolverTuning::default(),
        }
    }
}
