use thiserror::Error;

/// Rejected engine configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("time step must be positive and finite, got {0}")]
    InvalidStep(f64),

    #[error("max ticks per call must be at least 1")]
    NoTicksPerCall,

    #[error("torpedo {field} must be positive and finite, got {value}")]
    InvalidTorpedo { field: &'static str, value: f64 },

    #[error("solver tuning {field} must be positive and finite, got {value}")]
    InvalidTuning { field: &'static str, value: f64 },
}

/// Failure loading a scenario file.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid scenario configuration: {0}")]
    Config(#[from] ConfigError),
}
