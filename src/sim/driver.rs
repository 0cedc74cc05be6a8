use log::{debug, warn};
use serde::Serialize;

use crate::angles::{normalize_degrees, normalize_signed, Side};
use crate::config::TdcConfig;
use crate::error::ConfigError;
use crate::keeper::{KeeperInputs, KeeperOutputs, PositionKeeper};
use crate::kinematics::{Geometry, KinematicState, TdcInputs};
use crate::solver::{AngleSolver, GyroServo, SolverInputs, SolverOutputs};
use crate::trajectory::TorpedoTrajectory;
use crate::view::{MechanismSnapshot, MechanismView};

/// Slack when comparing accumulated time against the fixed step.
const TICK_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Everything the computer shows after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TdcOutputs {
    pub time: f64,
    pub gyro_angle: f64,       // deg, [-90, 90], positive to starboard
    pub gyro_angle_360: f64,   // deg, [0, 360)
    pub lead_angle: f64,       // G - Br
    pub torpedo_heading: f64,  // deg true after the turn
    pub bearing: f64,          // deg true
    pub range: f64,            // yards
    pub relative_bearing: f64,
    pub target_angle: f64,
    pub angle_on_bow: f64,     // |A|
    pub angle_on_bow_side: Side,
    pub impact_angle: f64,
    pub track_angle: f64,      // |I|
    pub track_side: Side,
    pub run: f64,              // yards
    pub run_time: f64,         // s
    pub error_17: f64,
    pub error_18: f64,
    pub servo_rate: f64,       // deg/s
    pub bearing_change: f64,
    pub range_change: f64,
    pub generated_range: f64,
    pub feasible: bool,
    pub solved: bool,
}

impl TdcOutputs {
    fn compose(
        time: f64,
        own_course: f64,
        geometry: &Geometry,
        keeper: &KeeperOutputs,
        solver: &SolverOutputs,
    ) -> Self {
        let b = &solver.balance;
        let impact = normalize_signed(b.impact_angle);
        Self {
            time,
            gyro_angle: b.gyro,
            gyro_angle_360: normalize_degrees(b.gyro),
            lead_angle: b.lead,
            torpedo_heading: normalize_degrees(own_course + b.gyro),
            bearing: geometry.bearing,
            range: geometry.range,
            relative_bearing: keeper.relative_bearing,
            target_angle: keeper.target_angle,
            angle_on_bow: keeper.target_angle.abs(),
            angle_on_bow_side: Side::of(keeper.target_angle),
            impact_angle: impact,
            track_angle: impact.abs(),
            track_side: Side::of(impact),
            run: b.run,
            run_time: b.run_time,
            error_17: b.error_17,
            error_18: b.error_18,
            servo_rate: solver.rate,
            bearing_change: keeper.bearing_change,
            range_change: keeper.range_change,
            generated_range: keeper.generated_range,
            feasible: b.feasible,
            solved: solver.solved,
        }
    }
}

// ---------------------------------------------------------------------------
// The computer
// ---------------------------------------------------------------------------

/// One Torpedo Data Computer. Instances share nothing; each owns its
/// kinematics, Position Keeper, Angle Solver and mechanism view.
pub struct Tdc {
    config: TdcConfig,
    inputs: TdcInputs,
    kinematics: KinematicState,
    keeper: PositionKeeper,
    solver: AngleSolver,
    view: MechanismView,
    accumulator: f64,
    time: f64,
    outputs: TdcOutputs,
}

impl Tdc {
    pub fn new(config: TdcConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let solver = AngleSolver::new(&config);
        Ok(Self::assemble(config, solver))
    }

    /// Build with a caller-supplied gyro servo.
    pub fn with_servo(config: TdcConfig, servo: Box<dyn GyroServo>) -> Result<Self, ConfigError> {
        config.validate()?;
        let solver = AngleSolver::with_servo(&config, servo);
        Ok(Self::assemble(config, solver))
    }

    fn assemble(config: TdcConfig, solver: AngleSolver) -> Self {
        let inputs = TdcInputs::default();
        let mut tdc = Self {
            kinematics: KinematicState::from_inputs(&inputs),
            config,
            inputs,
            keeper: PositionKeeper::new(),
            solver,
            view: MechanismView::new(),
            accumulator: 0.0,
            time: 0.0,
            outputs: TdcOutputs::default(),
        };
        tdc.initialize();
        tdc
    }

    /// Set the inputs and start a fresh problem from them.
    pub fn with_inputs(mut self, inputs: TdcInputs) -> Self {
        self.inputs = inputs;
        self.initialize();
        self
    }

    /// Feed new dial settings. Takes effect on the next tick; the solver
    /// keeps its present gyro angle and carries on hunting from there.
    pub fn set_inputs(&mut self, inputs: TdcInputs) {
        self.inputs = inputs;
        self.kinematics.apply_inputs(&inputs);
    }

    pub fn inputs(&self) -> &TdcInputs {
        &self.inputs
    }

    /// Reset every stateful part for a new problem: ship positions,
    /// integrators, the keeper's reference range, the gyro, the servo, the
    /// solved flag, the mechanism view and the clock.
    pub fn initialize(&mut self) {
        self.kinematics = KinematicState::from_inputs(&self.inputs);
        let geometry = self.kinematics.geometry();

        self.keeper.reset(geometry.range);
        let keeper = self.keeper.update(&self.keeper_inputs(&geometry), 0.0);
        let solver_inputs = self.solver_inputs(&keeper);
        self.solver.seed(&solver_inputs);

        self.accumulator = 0.0;
        self.time = 0.0;
        self.view.reset();
        self.refresh_view(0.0);
        self.outputs = TdcOutputs::compose(
            self.time,
            self.inputs.own_course,
            &geometry,
            &keeper,
            self.solver.outputs(),
        );
        debug!(
            "initialized: B {:.1} R {:.0} Br {:.1} A {:.1}",
            geometry.bearing, geometry.range, keeper.relative_bearing, keeper.target_angle
        );
    }

    /// Advance by `dt` seconds of caller time, running as many fixed ticks
    /// as fit. Leftover time is carried into the next call.
    pub fn step(&mut self, dt: f64) -> &TdcOutputs {
        if !dt.is_finite() || dt < 0.0 {
            warn!("ignoring invalid time step {}", dt);
            return &self.outputs;
        }

        self.accumulator += dt;
        let step = self.config.step;
        let mut ticks = 0;
        while self.accumulator >= step - TICK_TOLERANCE && ticks < self.config.max_ticks_per_call {
            self.tick();
            self.accumulator -= step;
            ticks += 1;
        }
        if self.accumulator >= step - TICK_TOLERANCE {
            warn!(
                "dropping {:.3} s of elapsed time after {} ticks",
                self.accumulator, ticks
            );
            self.accumulator = 0.0;
        }
        self.accumulator = self.accumulator.max(0.0);
        &self.outputs
    }

    fn tick(&mut self) {
        let dt = self.config.step;
        self.kinematics.advance(dt);
        let geometry = self.kinematics.geometry();

        let keeper = self.keeper.update(&self.keeper_inputs(&geometry), dt);
        let solver = self.solver.update(&self.solver_inputs(&keeper), dt);

        self.time += dt;
        self.refresh_view(dt);
        self.outputs =
            TdcOutputs::compose(self.time, self.inputs.own_course, &geometry, &keeper, &solver);
    }

    fn keeper_inputs(&self, geometry: &Geometry) -> KeeperInputs {
        KeeperInputs {
            own_course: self.inputs.own_course,
            own_speed: self.inputs.own_speed,
            target_course: self.inputs.target_course,
            target_speed: self.inputs.target_speed,
            bearing: geometry.bearing,
            range: geometry.range,
        }
    }

    fn solver_inputs(&self, keeper: &KeeperOutputs) -> SolverInputs {
        SolverInputs {
            relative_bearing: keeper.relative_bearing,
            target_angle: keeper.target_angle,
            range: keeper.range,
            target_speed: self.inputs.target_speed,
        }
    }

    fn refresh_view(&mut self, dt: f64) {
        let readings = self.keeper.readings().into_iter().chain(self.solver.readings());
        self.view.refresh(readings, dt, self.time);
    }

    pub fn outputs(&self) -> &TdcOutputs {
        &self.outputs
    }

    /// Copy of the mechanism's display state.
    pub fn snapshot(&self) -> MechanismSnapshot {
        self.view.snapshot().clone()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn config(&self) -> &TdcConfig {
        &self.config
    }

    pub fn kinematics(&self) -> &KinematicState {
        &self.kinematics
    }

    pub fn servo_name(&self) -> &str {
        self.solver.servo_name()
    }

    /// Path the torpedo would take if fired now.
    pub fn trajectory(&self) -> TorpedoTrajectory {
        TorpedoTrajectory::compute(
            self.inputs.own_course,
            self.outputs.gyro_angle,
            &self.config.torpedo,
            self.outputs.run,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanism::ComponentKind;

    fn static_inputs() -> TdcInputs {
        TdcInputs {
            own_course: 0.0,
            own_speed: 0.0,
            target_bearing: 30.0,
            target_range: 3000.0,
            target_course: 180.0,
            target_speed: 0.0,
        }
    }

    fn tdc() -> Tdc {
        Tdc::new(TdcConfig::default()).unwrap().with_inputs(static_inputs())
    }

    #[test]
    fn rejects_invalid_config() {
        let config = TdcConfig { step: f64::NAN, ..Default::default() };
        assert!(Tdc::new(config).is_err());
    }

    #[test]
    fn initialize_seeds_gyro_at_bearing() {
        let t = tdc();
        assert!((t.outputs().gyro_angle - 30.0).abs() < 1e-9);
        assert!((t.outputs().relative_bearing - 30.0).abs() < 1e-9);
        assert!(!t.outputs().solved);
        assert_eq!(t.time(), 0.0);
    }

    #[test]
    fn step_runs_whole_ticks_and_carries_remainder() {
        let mut t = tdc();
        t.step(0.25);
        assert!((t.time() - 0.2).abs() < 1e-12);
        t.step(0.05);
        assert!((t.time() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn invalid_dt_is_ignored() {
        let mut t = tdc();
        t.step(-1.0);
        t.step(f64::NAN);
        assert_eq!(t.time(), 0.0);
    }

    #[test]
    fn long_pause_is_capped() {
        let mut t = tdc();
        t.step(3600.0);
        let max = t.config().step * t.config().max_ticks_per_call as f64;
        assert!((t.time() - max).abs() < 1e-6);
        t.step(0.1);
        assert!((t.time() - max - 0.1).abs() < 1e-6);
    }

    #[test]
    fn initialize_resets_clock_and_flag() {
        let mut t = tdc();
        for _ in 0..100 {
            t.step(0.1);
        }
        assert!(t.outputs().solved);
        t.initialize();
        assert_eq!(t.time(), 0.0);
        assert!(!t.outputs().solved);
        assert!((t.outputs().gyro_angle - 30.0).abs() < 1e-9);
    }

    #[test]
    fn initialize_clears_integrators_and_servo() {
        let mut t = Tdc::new(TdcConfig::default()).unwrap().with_inputs(TdcInputs {
            own_course: 0.0,
            own_speed: 8.0,
            target_bearing: 40.0,
            target_range: 2500.0,
            target_course: 250.0,
            target_speed: 10.0,
        });
        for _ in 0..100 {
            t.step(0.1);
        }
        let integrators = |t: &Tdc| -> Vec<f64> {
            t.snapshot()
                .components
                .iter()
                .filter(|c| c.kind == ComponentKind::Integrator)
                .map(|c| c.value)
                .collect()
        };
        assert_eq!(integrators(&t).len(), 4);
        assert!(integrators(&t).iter().all(|v| *v != 0.0));
        assert!(t.outputs().servo_rate != 0.0);

        t.initialize();
        assert!(integrators(&t).iter().all(|v| *v == 0.0));
        assert_eq!(t.outputs().servo_rate, 0.0);
        assert_eq!(t.outputs().generated_range, t.outputs().range);
        assert!((t.outputs().range - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_lists_every_part() {
        let mut t = tdc();
        t.step(1.0);
        let snap = t.snapshot();
        assert_eq!(snap.components.len(), 19);
        assert!(snap.get("int_14").is_some());
        assert!(snap.get("diff_22FA").is_some());
        assert!(snap.components.iter().all(|c| (0.0..360.0).contains(&c.rotation)));
    }
}
