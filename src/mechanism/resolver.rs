use super::{ComponentKind, ComponentReading};
use crate::angles::normalize_signed;

/// Resolves a shaft angle (degrees) into its sine and cosine.
#[derive(Debug, Clone)]
pub struct Resolver {
    id: &'static str,
    name: &'static str,
    angle: f64,
    sin: f64,
    cos: f64,
}

impl Resolver {
    pub fn new(id: &'static str, name: &'static str) -> Self {
        Self { id, name, angle: 0.0, sin: 0.0, cos: 1.0 }
    }

    pub fn resolve(angle_deg: f64) -> (f64, f64) {
        normalize_signed(angle_deg).to_radians().sin_cos()
    }

    pub fn update(&mut self, angle_deg: f64) -> (f64, f64) {
        self.angle = normalize_signed(angle_deg);
        let (sin, cos) = Self::resolve(self.angle);
        self.sin = sin;
        self.cos = cos;
        (sin, cos)
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn sin(&self) -> f64 {
        self.sin
    }

    pub fn cos(&self) -> f64 {
        self.cos
    }

    pub fn reading(&self) -> ComponentReading {
        ComponentReading {
            id: self.id,
            name: self.name,
            kind: ComponentKind::Resolver,
            value: self.angle,
            drive: self.angle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_quadrants() {
        let mut r = Resolver::new("r", "test");
        let (s, c) = r.update(90.0);
        assert!((s - 1.0).abs() < 1e-12 && c.abs() < 1e-12);
        let (s, c) = r.update(-180.0);
        assert!(s.abs() < 1e-12 && (c + 1.0).abs() < 1e-12);
        assert_eq!(r.angle(), 180.0);
    }

    #[test]
    fn wraps_large_angles() {
        let (s1, c1) = Resolver::resolve(30.0);
        let (s2, c2) = Resolver::resolve(30.0 + 720.0);
        assert!((s1 - s2).abs() < 1e-9 && (c1 - c2).abs() < 1e-9);
    }
}
