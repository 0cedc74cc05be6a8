use std::thread;

use approx::assert_abs_diff_eq;
use tdc_sim::sim::event::EventKind;
use tdc_sim::sim::run;
use tdc_sim::{presets, Scenario, ScenarioBuilder, Tdc, TorpedoSpec};
use test_log::test;

fn run_for(scenario: &Scenario, ticks: usize) -> Tdc {
    let mut tdc = Tdc::new(scenario.config.clone()).unwrap().with_inputs(scenario.inputs);
    for _ in 0..ticks {
        tdc.step(0.1);
    }
    tdc
}

#[test]
fn head_on_needs_no_lead() {
    let tdc = run_for(&presets::head_on(), 100);
    let out = tdc.outputs();
    assert!(out.solved);
    assert!(out.gyro_angle.abs() < 1.0, "G = {}", out.gyro_angle);
    assert!(out.angle_on_bow < 1.0);
}

#[test]
fn near_head_on_settles_between_zero_and_twenty() {
    let scenario = ScenarioBuilder::new("near head-on")
        .target_at(10.0, 2000.0)
        .target_motion(190.0, 10.0)
        .build();
    let tdc = run_for(&scenario, 200);
    let out = tdc.outputs();
    assert!(out.solved);
    assert!(out.gyro_angle > 0.0 && out.gyro_angle < 20.0, "G = {}", out.gyro_angle);
}

#[test]
fn abeam_closing_target_holds_gyro_at_stop() {
    // Bearing 090 from a stopped boat: the turn-in plus reach needs more
    // than 90° of gyro, so the solver sits on the stop without a solution.
    let tdc = run_for(&presets::stationary_intercept(), 300);
    let out = tdc.outputs();
    assert_abs_diff_eq!(out.gyro_angle, 90.0, epsilon = 1e-9);
    assert!(!out.solved);
    assert!(out.error_18.is_finite());
}

#[test]
fn stern_chase_never_solves() {
    let scenario = presets::stern_chase();
    let mut tdc = Tdc::new(scenario.config.clone()).unwrap().with_inputs(scenario.inputs);
    for _ in 0..1000 {
        let out = tdc.step(0.1);
        assert!(!out.solved, "solved at t = {}", out.time);
        assert!(!out.feasible);
    }
}

#[test]
fn deflection_shot_leads_the_target() {
    let tdc = run_for(&presets::deflection_shot(), 100);
    let out = tdc.outputs();
    assert!(out.solved);
    assert!(out.gyro_angle > 8.0 && out.gyro_angle < 18.0, "G = {}", out.gyro_angle);
    assert!(out.lead_angle > 5.0, "lead = {}", out.lead_angle);
    assert!(out.error_18.abs() < 50.0);
}

#[test]
fn deflection_shot_keeps_tracking() {
    let (samples, events) = run(&presets::deflection_shot()).unwrap();
    let solved_at = samples.iter().position(|s| s.solved).expect("never solved");
    assert!(samples[solved_at..].iter().all(|s| s.solved));
    assert_eq!(events.iter().filter(|e| e.kind == EventKind::Solved).count(), 1);
}

#[test]
fn convoy_attack_solves() {
    let (samples, _) = run(&presets::convoy_attack()).unwrap();
    let last = samples.last().unwrap();
    assert!(last.solved);
    assert!(last.gyro_angle.abs() < 30.0, "G = {}", last.gyro_angle);
    assert!(last.run < TorpedoSpec::mark14_high().max_run_yards);
}

#[test]
fn slow_torpedo_gives_larger_lead() {
    let fast = run_for(&presets::deflection_shot(), 100);
    let slow_scenario = ScenarioBuilder::new("deflection, Mark 18")
        .target_at(0.0, 1000.0)
        .target_motion(90.0, 8.0)
        .torpedo(TorpedoSpec::mark18())
        .build();
    let slow = run_for(&slow_scenario, 100);
    assert!(slow.outputs().solved);
    assert!(slow.outputs().gyro_angle > fast.outputs().gyro_angle);
}

#[test]
fn keeper_generated_range_tracks_true_range() {
    let tdc = run_for(&presets::deflection_shot(), 600);
    let out = tdc.outputs();
    assert!(out.range > 1000.0);
    assert_abs_diff_eq!(out.generated_range, out.range, epsilon = 2.0);
    assert!(out.bearing_change > 0.0);
}

#[test]
fn trajectory_ends_near_target() {
    let tdc = run_for(&presets::deflection_shot(), 100);
    let path = tdc.trajectory();
    assert_abs_diff_eq!(path.total_run(), tdc.outputs().run, epsilon = 1e-6);
    assert_abs_diff_eq!(path.final_heading, tdc.outputs().torpedo_heading, epsilon = 1e-9);
}

#[test]
fn independent_instances_on_threads() {
    let sequential: Vec<f64> = presets::all()
        .iter()
        .map(|s| run_for(s, 300).outputs().gyro_angle)
        .collect();

    let handles: Vec<_> = presets::all()
        .into_iter()
        .map(|s| thread::spawn(move || run_for(&s, 300).outputs().gyro_angle))
        .collect();
    let threaded: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(sequential, threaded);
}
