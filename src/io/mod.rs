pub mod csv;
pub mod json;

pub use json::{read_scenario, RunSummary};
