use log::info;

use crate::error::ConfigError;
use crate::scenario::Scenario;
use super::driver::{Tdc, TdcOutputs};
use super::event::{EventDetector, GyroStopDetector, LostDetector, SimEvent, SolvedDetector};

// ---------------------------------------------------------------------------
// Scenario runs
// ---------------------------------------------------------------------------

/// Run a prepared computer for `duration` seconds in fixed ticks, feeding
/// every pair of consecutive outputs to the detectors.
/// Returns one output sample per tick (the initial state first) and the
/// events seen.
pub fn run_with(
    tdc: &mut Tdc,
    duration: f64,
    detectors: &mut [Box<dyn EventDetector>],
) -> (Vec<TdcOutputs>, Vec<SimEvent>) {
    let step = tdc.config().step;
    let ticks = if duration.is_finite() && duration > 0.0 {
        (duration / step).round() as usize
    } else {
        0
    };

    let mut samples = Vec::with_capacity(ticks.min(200_000) + 1);
    let mut events = Vec::new();
    samples.push(*tdc.outputs());

    for _ in 0..ticks {
        let prev = *tdc.outputs();
        let current = *tdc.step(step);
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&prev, &current) {
                events.push(SimEvent { time: current.time, kind, outputs: current });
            }
        }
        samples.push(current);
    }

    (samples, events)
}

/// Run a scenario from a fresh computer with the standard detectors.
pub fn run(scenario: &Scenario) -> Result<(Vec<TdcOutputs>, Vec<SimEvent>), ConfigError> {
    let mut tdc = Tdc::new(scenario.config.clone())?.with_inputs(scenario.inputs);
    let mut detectors: Vec<Box<dyn EventDetector>> = vec![
        Box::new(SolvedDetector),
        Box::new(LostDetector),
        Box::new(GyroStopDetector),
    ];

    info!("running '{}' for {:.0} s", scenario.name, scenario.duration);
    let (samples, events) = run_with(&mut tdc, scenario.duration, &mut detectors);
    if let Some(last) = samples.last() {
        info!(
            "'{}' finished: G {:.1} run {:.0} yd solved {} ({} events)",
            scenario.name,
            last.gyro_angle,
            last.run,
            last.solved,
            events.len()
        );
    }
    Ok((samples, events))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::presets;
    use crate::sim::event::EventKind;

    #[test]
    fn one_sample_per_tick() {
        let mut s = presets::head_on();
        s.duration = 5.0;
        let (samples, _) = run(&s).unwrap();
        assert_eq!(samples.len(), 51);
        assert_eq!(samples[0].time, 0.0);
    }

    #[test]
    fn static_problem_reports_solution_once() {
        let mut s = presets::head_on();
        s.inputs.target_speed = 0.0;
        s.inputs.target_bearing = 30.0;
        s.inputs.target_range = 3000.0;
        let (_, events) = run(&s).unwrap();
        let solved: Vec<_> = events.iter().filter(|e| e.kind == EventKind::Solved).collect();
        assert_eq!(solved.len(), 1);
        assert!(events.iter().all(|e| e.kind != EventKind::SolutionLost));
    }

    #[test]
    fn abeam_target_stays_within_stops() {
        let (samples, events) = run(&presets::stationary_intercept()).unwrap();
        assert!(samples.iter().all(|s| s.gyro_angle.abs() <= 90.0));
        assert!(events.iter().all(|e| e.kind != EventKind::Solved));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let mut s = presets::head_on();
        s.config.step = 0.0;
        assert!(run(&s).is_err());
    }
}
