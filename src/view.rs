use serde::Serialize;

use crate::angles::normalize_degrees;
use crate::mechanism::{ComponentKind, ComponentReading};

/// Degrees of shaft rotation per unit of drive per second.
const SHAFT_RATIO: f64 = 10.0;
/// Cam face rotation per unit of input.
const CAM_RATIO: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentSnapshot {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ComponentKind,
    pub value: f64,
    pub rotation: f64, // deg, [0, 360)
}

/// Read-only picture of every part at one instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MechanismSnapshot {
    pub time: f64,
    pub components: Vec<ComponentSnapshot>,
}

impl MechanismSnapshot {
    pub fn get(&self, id: &str) -> Option<&ComponentSnapshot> {
        self.components.iter().find(|c| c.id == id)
    }
}

/// Display state for the mechanism. The numeric parts know nothing about
/// how their shafts look; this tracks it from their readings.
#[derive(Debug, Clone, Default)]
pub struct MechanismView {
    snapshot: MechanismSnapshot,
}

impl MechanismView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.snapshot = MechanismSnapshot::default();
    }

    pub fn refresh<I>(&mut self, readings: I, dt: f64, time: f64)
    where
        I: IntoIterator<Item = ComponentReading>,
    {
        self.snapshot.time = time;
        for reading in readings {
            let previous = self.snapshot.get(reading.id).map(|c| c.rotation).unwrap_or(0.0);
            let rotation = normalize_degrees(match reading.kind {
                ComponentKind::Differential | ComponentKind::Integrator => {
                    previous + reading.drive * dt * SHAFT_RATIO
                }
                ComponentKind::Resolver => reading.drive,
                ComponentKind::Cam => reading.drive * CAM_RATIO,
            });
            let entry = ComponentSnapshot {
                id: reading.id,
                name: reading.name,
                kind: reading.kind,
                value: reading.value,
                rotation,
            };
            match self.snapshot.components.iter_mut().find(|c| c.id == reading.id) {
                Some(existing) => *existing = entry,
                None => self.snapshot.components.push(entry),
            }
        }
    }

    pub fn snapshot(&self) -> &MechanismSnapshot {
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(kind: ComponentKind, drive: f64) -> ComponentReading {
        ComponentReading { id: "x", name: "x", kind, value: drive, drive }
    }

    #[test]
    fn differential_shaft_accumulates() {
        let mut view = MechanismView::new();
        view.refresh([reading(ComponentKind::Differential, 3.0)], 1.0, 1.0);
        view.refresh([reading(ComponentKind::Differential, 3.0)], 1.0, 2.0);
        assert_eq!(view.snapshot().get("x").map(|c| c.rotation), Some(60.0));
        assert_eq!(view.snapshot().components.len(), 1);
    }

    #[test]
    fn resolver_and_cam_follow_input() {
        let mut view = MechanismView::new();
        view.refresh([reading(ComponentKind::Resolver, -30.0)], 0.1, 0.1);
        assert_eq!(view.snapshot().get("x").map(|c| c.rotation), Some(330.0));
        view.reset();
        view.refresh([reading(ComponentKind::Cam, 200.0)], 0.1, 0.1);
        assert_eq!(view.snapshot().get("x").map(|c| c.rotation), Some(40.0));
    }
}
