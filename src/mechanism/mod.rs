//! Mechanical primitives of the computer.
//!
//! Each unit owns only its own inputs and outputs. `Integrator` is the only
//! one with memory across steps; the others are functions of their current
//! inputs and remember them solely so a reading can be taken afterwards.

pub mod cam;
pub mod differential;
pub mod integrator;
pub mod resolver;

pub use cam::Cam;
pub use differential::{Differential, Operation};
pub use integrator::Integrator;
pub use resolver::Resolver;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComponentKind {
    Differential,
    Integrator,
    Resolver,
    Cam,
}

/// Read-only view of one primitive after an update.
///
/// `value` is the primitive's output; `drive` is the quantity that turns its
/// shaft (differential output, integrator disc rate, resolver angle, cam
/// input).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentReading {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ComponentKind,
    pub value: f64,
    pub drive: f64,
}
