use super::{ComponentKind, ComponentReading};

/// Largest accumulated travel (yards) the output shaft will carry.
pub const MAX_TRAVEL: f64 = 1e9;

// ---------------------------------------------------------------------------
// Disc-and-roller integrator
// ---------------------------------------------------------------------------

/// Mechanical integrator: the disc turns at `disc_rate` (yards/second), the
/// roller sits at `roller` (dimensionless, normally a sine or cosine in
/// [-1, 1]), and the output shaft accumulates `roller × disc_rate × dt`.
#[derive(Debug, Clone)]
pub struct Integrator {
    id: &'static str,
    name: &'static str,
    roller: f64,
    disc_rate: f64,
    accumulated: f64,
}

impl Integrator {
    pub fn new(id: &'static str, name: &'static str) -> Self {
        Self { id, name, roller: 0.0, disc_rate: 0.0, accumulated: 0.0 }
    }

    pub fn update(&mut self, roller: f64, disc_rate: f64, dt: f64) -> f64 {
        self.roller = roller;
        self.disc_rate = disc_rate;
        let next = self.accumulated + roller * disc_rate * dt;
        // Runaway or non-finite input leaves the shaft where it was.
        if next.is_finite() && next.abs() <= MAX_TRAVEL {
            self.accumulated = next;
        }
        self.accumulated
    }

    /// Zero the accumulated value. Only scenario initialization does this.
    pub fn reset(&mut self) {
        self.roller = 0.0;
        self.disc_rate = 0.0;
        self.accumulated = 0.0;
    }

    pub fn value(&self) -> f64 {
        self.accumulated
    }

    pub fn roller(&self) -> f64 {
        self.roller
    }

    pub fn disc_rate(&self) -> f64 {
        self.disc_rate
    }

    pub fn reading(&self) -> ComponentReading {
        ComponentReading {
            id: self.id,
            name: self.name,
            kind: ComponentKind::Integrator,
            value: self.accumulated,
            drive: self.disc_rate,
        }
    }
}
