use serde::{Deserialize, Serialize};

use crate::config::{TdcConfig, TorpedoSpec};
use crate::error::ScenarioError;
use crate::kinematics::TdcInputs;

// ---------------------------------------------------------------------------
// Scenario: one firing problem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub inputs: TdcInputs,
    #[serde(default = "default_duration")]
    pub duration: f64, // s
    #[serde(default)]
    pub config: TdcConfig,
}

fn default_duration() -> f64 {
    60.0
}

impl Scenario {
    /// Parse and validate a JSON scenario.
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(text)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Scenario builder
// ---------------------------------------------------------------------------

pub struct ScenarioBuilder {
    name: String,
    description: String,
    inputs: TdcInputs,
    duration: f64,
    config: TdcConfig,
}

impl ScenarioBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            inputs: TdcInputs::default(),
            duration: default_duration(),
            config: TdcConfig::default(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn own_ship(mut self, course: f64, speed: f64) -> Self {
        self.inputs.own_course = course;
        self.inputs.own_speed = speed;
        self
    }

    /// True bearing and range of the target.
    pub fn target_at(mut self, bearing: f64, range: f64) -> Self {
        self.inputs.target_bearing = bearing;
        self.inputs.target_range = range;
        self
    }

    pub fn target_motion(mut self, course: f64, speed: f64) -> Self {
        self.inputs.target_course = course;
        self.inputs.target_speed = speed;
        self
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    pub fn torpedo(mut self, torpedo: TorpedoSpec) -> Self {
        self.config.torpedo = torpedo;
        self
    }

    pub fn config(mut self, config: TdcConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Scenario {
        Scenario {
            name: self.name,
            description: self.description,
            inputs: self.inputs,
            duration: self.duration,
            config: self.config,
        }
    }
}

// ---------------------------------------------------------------------------
// Preset scenarios
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Stopped boat, target abeam to starboard steaming straight at it.
    pub fn stationary_intercept() -> Scenario {
        ScenarioBuilder::new("Stationary intercept")
            .description("Own ship stopped; target bearing 090 closing on course 270")
            .own_ship(0.0, 0.0)
            .target_at(90.0, 2000.0)
            .target_motion(270.0, 10.0)
            .build()
    }

    /// Target dead ahead on the reciprocal course.
    pub fn head_on() -> Scenario {
        ScenarioBuilder::new("Head-on")
            .description("Target dead ahead closing on the reciprocal course")
            .own_ship(0.0, 0.0)
            .target_at(0.0, 2000.0)
            .target_motion(180.0, 10.0)
            .build()
    }

    /// Target running directly away faster than the torpedo.
    pub fn stern_chase() -> Scenario {
        ScenarioBuilder::new("Stern chase")
            .description("Target dead ahead opening at 50 knots; no intercept exists")
            .own_ship(0.0, 0.0)
            .target_at(0.0, 2000.0)
            .target_motion(0.0, 50.0)
            .build()
    }

    /// Target crossing the bow at right angles.
    pub fn deflection_shot() -> Scenario {
        ScenarioBuilder::new("Deflection shot")
            .description("Target ahead at 1000 yards crossing left to right at 8 knots")
            .own_ship(0.0, 0.0)
            .target_at(0.0, 1000.0)
            .target_motion(90.0, 8.0)
            .build()
    }

    /// Night surface attack on a convoy ship.
    pub fn convoy_attack() -> Scenario {
        ScenarioBuilder::new("Convoy attack")
            .description("Own ship 281 at 3 knots; merchant bearing 291, 1300 yards, course 115 at 10 knots")
            .own_ship(281.0, 3.0)
            .target_at(291.0, 1300.0)
            .target_motion(115.0, 10.0)
            .build()
    }

    pub fn all() -> Vec<Scenario> {
        vec![
            stationary_intercept(),
            head_on(),
            stern_chase(),
            deflection_shot(),
            convoy_attack(),
        ]
    }
}
