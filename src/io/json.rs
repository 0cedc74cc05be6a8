use std::fs;
use std::io::Write;

use serde::Serialize;

use crate::error::ScenarioError;
use crate::kinematics::TdcInputs;
use crate::scenario::Scenario;
use crate::sim::event::SimEvent;
use crate::sim::TdcOutputs;

/// Summary of one scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scenario: String,
    pub torpedo: String,
    pub inputs: TdcInputs,
    pub duration: f64,
    pub first_solution_time: Option<f64>,
    pub solution_losses: usize,
    pub max_abs_error_18: f64,
    pub final_outputs: Option<TdcOutputs>,
    pub events: Vec<SimEvent>,
}

impl RunSummary {
    pub fn from_run(scenario: &Scenario, samples: &[TdcOutputs], events: &[SimEvent]) -> Self {
        let first_solution_time = samples.iter().find(|s| s.solved).map(|s| s.time);
        let solution_losses = samples.windows(2).filter(|w| w[0].solved && !w[1].solved).count();
        let max_abs_error_18 = samples
            .iter()
            .filter(|s| s.solved)
            .map(|s| s.error_18.abs())
            .fold(0.0_f64, f64::max);

        RunSummary {
            scenario: scenario.name.clone(),
            torpedo: scenario.config.torpedo.name.clone(),
            inputs: scenario.inputs,
            duration: samples.last().map_or(0.0, |s| s.time),
            first_solution_time,
            solution_losses,
            max_abs_error_18,
            final_outputs: samples.last().copied(),
            events: events.to_vec(),
        }
    }
}

/// Write a run summary as pretty JSON.
pub fn write_summary<W: Write>(writer: &mut W, summary: &RunSummary) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer).map_err(serde_json::Error::io)
}

pub fn write_summary_file(path: &str, summary: &RunSummary) -> serde_json::Result<()> {
    let mut file = fs::File::create(path).map_err(serde_json::Error::io)?;
    write_summary(&mut file, summary)
}

/// Load and validate a JSON scenario file.
pub fn read_scenario(path: &str) -> Result<Scenario, ScenarioError> {
    let text = fs::read_to_string(path)?;
    Scenario::from_json(&text)
}
