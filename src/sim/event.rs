use serde::Serialize;

use crate::angles::Side;
use crate::solver::GYRO_LIMIT;
use super::driver::TdcOutputs;

// ---------------------------------------------------------------------------
// Fire-control events
// ---------------------------------------------------------------------------

/// Kinds of fire-control events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventKind {
    Solved,
    SolutionLost,
    GyroStop { side: Side },
    Custom(String),
}

/// A discrete event that occurred during a run.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub outputs: TdcOutputs,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive outputs and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &TdcOutputs, current: &TdcOutputs) -> Option<EventKind>;
}

/// Detects the solution light coming on.
pub struct SolvedDetector;

impl EventDetector for SolvedDetector {
    fn check(&mut self, prev: &TdcOutputs, current: &TdcOutputs) -> Option<EventKind> {
        (!prev.solved && current.solved).then_some(EventKind::Solved)
    }
}

/// Detects the solution light going out.
pub struct LostDetector;

impl EventDetector for LostDetector {
    fn check(&mut self, prev: &TdcOutputs, current: &TdcOutputs) -> Option<EventKind> {
        (prev.solved && !current.solved).then_some(EventKind::SolutionLost)
    }
}

/// Detects the gyro angle running onto a stop.
pub struct GyroStopDetector;

impl EventDetector for GyroStopDetector {
    fn check(&mut self, prev: &TdcOutputs, current: &TdcOutputs) -> Option<EventKind> {
        if prev.gyro_angle.abs() < GYRO_LIMIT && current.gyro_angle.abs() >= GYRO_LIMIT {
            Some(EventKind::GyroStop { side: Side::of(current.gyro_angle) })
        } else {
            None
        }
    }
}

/// Detects the present range closing inside a given distance. Fires once.
pub struct RangeDetector {
    pub range: f64,
    fired: bool,
}

impl RangeDetector {
    pub fn new(range: f64) -> Self {
        Self { range, fired: false }
    }
}

impl EventDetector for RangeDetector {
    fn check(&mut self, prev: &TdcOutputs, current: &TdcOutputs) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        if prev.range > self.range && current.range <= self.range {
            self.fired = true;
            Some(EventKind::Custom(format!("Range {:.0} yd", self.range)))
        } else {
            None
        }
    }
}
