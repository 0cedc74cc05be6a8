use crate::config::Thresholds;

/// Solved / hunting flag with hysteresis between the two thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionLatch {
    solved: bool,
}

impl SolutionLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one residual. Returns `Some(new_state)` when the flag flips.
    pub fn update(&mut self, error_18: f64, valid: bool, thresholds: Thresholds) -> Option<bool> {
        let e = error_18.abs();
        let next = if self.solved {
            valid && e <= thresholds.unsolve
        } else {
            valid && e < thresholds.solve
        };
        let changed = next != self.solved;
        self.solved = next;
        changed.then_some(next)
    }

    pub fn solved(&self) -> bool {
        self.solved
    }

    pub fn reset(&mut self) {
        self.solved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Thresholds = Thresholds { solve: 10.0, unsolve: 100.0 };

    #[test]
    fn hysteresis_band() {
        let mut latch = SolutionLatch::new();
        assert_eq!(latch.update(50.0, true, T), None);
        assert_eq!(latch.update(5.0, true, T), Some(true));
        // inside the band: stays solved
        assert_eq!(latch.update(-80.0, true, T), None);
        assert!(latch.solved());
        assert_eq!(latch.update(120.0, true, T), Some(false));
        // inside the band again: stays hunting
        assert_eq!(latch.update(50.0, true, T), None);
        assert!(!latch.solved());
    }

    #[test]
    fn invalid_solution_never_latches() {
        let mut latch = SolutionLatch::new();
        assert_eq!(latch.update(0.0, false, T), None);
        latch.update(0.0, true, T);
        assert_eq!(latch.update(0.0, false, T), Some(false));
    }
}
