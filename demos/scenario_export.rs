use std::path::Path;

use tdc_sim::io::{csv, json, read_scenario, RunSummary};
use tdc_sim::{presets, sim, Tdc};

/// Run a scenario (a JSON file given on the command line, or every preset)
/// and write CSV samples, the torpedo path and a JSON summary.
fn main() {
    env_logger::init();

    let scenarios = match std::env::args().nth(1) {
        Some(path) => match read_scenario(&path) {
            Ok(s) => vec![s],
            Err(e) => {
                eprintln!("{}: {}", path, e);
                return;
            }
        },
        None => presets::all(),
    };

    let out_dir = Path::new("target/tdc-runs");
    if let Err(e) = std::fs::create_dir_all(out_dir) {
        eprintln!("cannot create {}: {}", out_dir.display(), e);
        return;
    }

    for scenario in &scenarios {
        let (samples, events) = match sim::run(scenario) {
            Ok(run) => run,
            Err(e) => {
                eprintln!("{}: {}", scenario.name, e);
                continue;
            }
        };
        let stem = scenario.name.to_lowercase().replace(' ', "_");
        let path = |ext: &str| out_dir.join(format!("{}{}", stem, ext)).display().to_string();

        let summary = RunSummary::from_run(scenario, &samples, &events);
        let trajectory = Tdc::new(scenario.config.clone())
            .map(|tdc| {
                let mut tdc = tdc.with_inputs(scenario.inputs);
                tdc.step(scenario.duration);
                tdc.trajectory()
            });

        let written = csv::write_samples_file(&path(".csv"), &samples)
            .map_err(|e| e.to_string())
            .and_then(|_| json::write_summary_file(&path(".json"), &summary).map_err(|e| e.to_string()))
            .and_then(|_| match &trajectory {
                Ok(t) => csv::write_trajectory_file(&path("_path.csv"), t).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            });

        match written {
            Ok(()) => println!(
                "{:<22} solved at {:>6}  ->  {}",
                scenario.name,
                summary.first_solution_time.map_or("never".to_string(), |t| format!("{:.1} s", t)),
                path(".json")
            ),
            Err(e) => eprintln!("{}: {}", scenario.name, e),
        }
    }
}
