use std::fmt;
use std::sync::Arc;

use super::{ComponentKind, ComponentReading};

type Profile = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Shaped cam: output is an arbitrary function of the input shaft.
#[derive(Clone)]
pub struct Cam {
    id: &'static str,
    name: &'static str,
    profile: Profile,
    input: f64,
    output: f64,
}

impl Cam {
    pub fn new(
        id: &'static str,
        name: &'static str,
        profile: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        let profile: Profile = Arc::new(profile);
        let output = profile(0.0);
        Self { id, name, profile, input: 0.0, output }
    }

    /// Cam whose follower never moves.
    pub fn constant(id: &'static str, name: &'static str, value: f64) -> Self {
        Self::new(id, name, move |_| value)
    }

    pub fn eval(&self, input: f64) -> f64 {
        (self.profile)(input)
    }

    pub fn update(&mut self, input: f64) -> f64 {
        self.input = input;
        self.output = self.eval(input);
        self.output
    }

    pub fn input(&self) -> f64 {
        self.input
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn reading(&self) -> ComponentReading {
        ComponentReading {
            id: self.id,
            name: self.name,
            kind: ComponentKind::Cam,
            value: self.output,
            drive: self.input,
        }
    }
}

impl fmt::Debug for Cam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cam")
            .field("id", &self.id)
            .field("input", &self.input)
            .field("output", &self.output)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_profile() {
        let mut cam = Cam::new("c", "square", |x| x * x);
        assert_eq!(cam.update(3.0), 9.0);
        assert_eq!(cam.input(), 3.0);
        assert_eq!(cam.eval(-2.0), 4.0);
        assert_eq!(cam.output(), 9.0);
    }

    #[test]
    fn constant_profile() {
        let cam = Cam::constant("p", "reach", 75.0);
        assert_eq!(cam.eval(40.0), 75.0);
        assert_eq!(cam.output(), 75.0);
    }
}
