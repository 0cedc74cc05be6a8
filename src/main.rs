use std::process::ExitCode;

use log::error;

use tdc_sim::io::read_scenario;
use tdc_sim::scenario::{presets, Scenario};
use tdc_sim::sim::{self, TdcOutputs};
use tdc_sim::sim::event::EventKind;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("tdc_sim=info"))
        .init();

    // -----------------------------------------------------------------------
    // Scenario: JSON file from the command line, or the convoy preset
    // -----------------------------------------------------------------------
    let scenario = match std::env::args().nth(1) {
        Some(path) => match read_scenario(&path) {
            Ok(s) => s,
            Err(e) => {
                error!("{}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => presets::convoy_attack(),
    };

    let (samples, events) = match sim::run(&scenario) {
        Ok(run) => run,
        Err(e) => {
            error!("invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    report(&scenario, &samples, &events);
    ExitCode::SUCCESS
}

fn report(scenario: &Scenario, samples: &[TdcOutputs], events: &[sim::event::SimEvent]) {
    let inputs = &scenario.inputs;
    let torpedo = &scenario.config.torpedo;

    println!();
    println!("====================================================================");
    println!("  TORPEDO DATA COMPUTER MARK III: {}", scenario.name);
    println!("====================================================================");
    println!();
    println!("  Inputs");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Own course:    {:>7.1}°       Own speed:    {:>6.1} kn",
        inputs.own_course, inputs.own_speed
    );
    println!(
        "  Target brg:    {:>7.1}°       Range:        {:>6.0} yd",
        inputs.target_bearing, inputs.target_range
    );
    println!(
        "  Target course: {:>7.1}°       Target speed: {:>6.1} kn",
        inputs.target_course, inputs.target_speed
    );
    println!(
        "  Torpedo:       {}  ({:.1} kn, reach {:.0} yd, max run {:.0} yd)",
        torpedo.name, torpedo.speed_knots, torpedo.reach_yards, torpedo.max_run_yards
    );
    println!();

    println!("  Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    if events.is_empty() {
        println!("  (none)");
    }
    for e in events {
        let label = match &e.kind {
            EventKind::Solved => "SOLUTION".to_string(),
            EventKind::SolutionLost => "LOST".to_string(),
            EventKind::GyroStop { side } => format!("GYRO STOP {}", side.letter()),
            EventKind::Custom(text) => text.clone(),
        };
        println!(
            "  {:<12} t={:>6.1}s   G={:>6.1}°   E18={:>7.1} yd",
            label, e.time, e.outputs.gyro_angle, e.outputs.error_18
        );
    }
    println!();

    let Some(last) = samples.last() else {
        return;
    };

    println!("  Firing Solution (t = {:.1} s)", last.time);
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Gyro angle:    {:>7.1}°  ({:05.1})   Lead angle:   {:>6.1}°",
        last.gyro_angle, last.gyro_angle_360, last.lead_angle
    );
    println!(
        "  Torpedo hdg:   {:>7.1}°          Track angle:  {:>6.1}° {}",
        last.torpedo_heading,
        last.track_angle,
        last.track_side.letter()
    );
    println!(
        "  Angle on bow:  {:>7.1}° {}        Run:          {:>6.0} yd",
        last.angle_on_bow,
        last.angle_on_bow_side.letter(),
        last.run
    );
    println!(
        "  Run time:      {:>7.1} s         Range now:    {:>6.0} yd",
        last.run_time, last.range
    );
    println!(
        "  Status:        {}",
        match (last.solved, last.feasible) {
            (true, _) => "SOLUTION",
            (false, true) => "HUNTING",
            (false, false) => "NO INTERCEPT",
        }
    );
    println!();

    // -----------------------------------------------------------------------
    // Solver history (sampled)
    // -----------------------------------------------------------------------
    println!("  Solver History");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>8}  {:>9}  {:>8}  {:>7}",
        "t (s)", "G (deg)", "Br (deg)", "E18 (yd)", "R (yd)", "state"
    );
    println!("  {}", "─".repeat(60));

    let sample_interval = (samples.len() / 30).max(1);
    for (i, s) in samples.iter().enumerate() {
        if i % sample_interval != 0 && i != samples.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.1}  {:>8.2}  {:>8.2}  {:>9.1}  {:>8.0}  {:>7}",
            s.time,
            s.gyro_angle,
            s.relative_bearing,
            s.error_18,
            s.range,
            if s.solved { "SOLVED" } else { "HUNT" }
        );
    }

    println!();
    println!("  Run: {} ticks, step={} s", samples.len() - 1, scenario.config.step);
    println!("====================================================================");
    println!();
}
