use crate::config::SolverTuning;

/// Follow-up motor that turns the gyro-angle shaft.
///
/// Implement this to try other servo laws; install it with
/// [`Tdc::with_servo`](crate::sim::driver::Tdc::with_servo).
pub trait GyroServo: Send {
    /// Shaft rate (deg/s) for the commanded correction (deg) over one tick.
    fn drive(&mut self, correction: f64, solved: bool, dt: f64) -> f64;

    /// Present shaft rate (deg/s).
    fn rate(&self) -> f64;

    /// Stop the motor dead, e.g. against a gyro stop.
    fn halt(&mut self);

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Rate servo with momentum: the commanded rate is reached through a first
/// order lag, which gives the hunting motion of the real follow-up.
#[derive(Debug, Clone)]
pub struct InertialServo {
    pub response_time: f64,
    pub max_rate: f64,
    pub inertia: f64,
    pub tracking_gain: f64,
    rate: f64,
}

impl InertialServo {
    pub fn new(tuning: &SolverTuning) -> Self {
        Self {
            response_time: tuning.response_time,
            max_rate: tuning.max_rate,
            inertia: tuning.inertia,
            tracking_gain: tuning.tracking_gain,
            rate: 0.0,
        }
    }
}

impl Default for InertialServo {
    fn default() -> Self {
        Self::new(&SolverTuning::default())
    }
}

impl GyroServo for InertialServo {
    fn drive(&mut self, correction: f64, solved: bool, dt: f64) -> f64 {
        let gain = if solved { self.tracking_gain } else { 1.0 };
        let commanded = (gain * correction / self.response_time).clamp(-self.max_rate, self.max_rate);
        let blend = if self.inertia + dt > 0.0 { dt / (self.inertia + dt) } else { 1.0 };
        self.rate += (commanded - self.rate) * blend;
        if !self.rate.is_finite() {
            self.rate = 0.0;
        }
        self.rate
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn halt(&mut self) {
        self.rate = 0.0;
    }

    fn name(&self) -> &str {
        "inertial"
    }
}
