pub mod angles;
pub mod config;
pub mod error;
pub mod io;
pub mod keeper;
pub mod kinematics;
pub mod mechanism;
pub mod scenario;
pub mod sim;
pub mod solver;
pub mod trajectory;
pub mod view;

pub use config::{SolverTuning, TdcConfig, TorpedoSpec};
pub use error::{ConfigError, ScenarioError};
pub use kinematics::TdcInputs;
pub use scenario::{presets, Scenario, ScenarioBuilder};
pub use sim::{Tdc, TdcOutputs};
