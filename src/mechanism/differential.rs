use super::{ComponentKind, ComponentReading};

// ---------------------------------------------------------------------------
// Bevel-gear differential
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
}

/// Adds or subtracts two shaft inputs. The operation is fixed when the
/// differential is built.
#[derive(Debug, Clone)]
pub struct Differential {
    id: &'static str,
    name: &'static str,
    operation: Operation,
    inputs: (f64, f64),
    output: f64,
}

impl Differential {
    pub fn new(id: &'static str, name: &'static str, operation: Operation) -> Self {
        Self { id, name, operation, inputs: (0.0, 0.0), output: 0.0 }
    }

    pub fn add(id: &'static str, name: &'static str) -> Self {
        Self::new(id, name, Operation::Add)
    }

    pub fn subtract(id: &'static str, name: &'static str) -> Self {
        Self::new(id, name, Operation::Subtract)
    }

    /// Transfer function without touching the recorded state.
    pub fn apply(&self, a: f64, b: f64) -> f64 {
        match self.operation {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
        }
    }

    pub fn update(&mut self, a: f64, b: f64) -> f64 {
        self.inputs = (a, b);
        self.output = self.apply(a, b);
        self.output
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn inputs(&self) -> (f64, f64) {
        self.inputs
    }

    pub fn reading(&self) -> ComponentReading {
        ComponentReading {
            id: self.id,
            name: self.name,
            kind: ComponentKind::Differential,
            value: self.output,
            drive: self.output,
        }
    }
}
