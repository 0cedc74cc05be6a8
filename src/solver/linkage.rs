use nalgebra::Vector2;
use serde::Serialize;

use crate::angles::knots_to_yps;
use crate::config::TorpedoSpec;
use crate::mechanism::{Cam, ComponentReading, Differential, Resolver};

const EPS: f64 = 1e-9;

/// Quantities the angle solver reads from the Position Keeper.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolverInputs {
    pub relative_bearing: f64, // Br, deg
    pub target_angle: f64,     // A, deg
    pub range: f64,            // R, yards
    pub target_speed: f64,     // S, knots
}

/// Both balance equations evaluated at one trial gyro angle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Balance {
    pub gyro: f64,          // G, deg
    pub lead: f64,          // G - Br, deg
    pub impact_angle: f64,  // I = A + G - Br, deg
    pub transfer: f64,      // J, yards
    pub pseudo_run: f64,    // Us, yards
    pub final_run: f64,     // F, yards
    pub run: f64,           // U, yards
    pub run_time: f64,      // T, s
    pub target_travel: f64, // H, yards
    pub error_17: f64,      // yards
    pub error_18: f64,      // yards
    pub feasible: bool,
    pub wrong_branch: bool,
}

impl Balance {
    /// Usable as a firing solution.
    pub fn is_valid(&self) -> bool {
        self.feasible && !self.wrong_branch
    }

    fn is_finite(&self) -> bool {
        [
            self.transfer,
            self.pseudo_run,
            self.final_run,
            self.run,
            self.run_time,
            self.target_travel,
            self.error_17,
            self.error_18,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Smallest τ >= 0 with |d + vt·τ| = v·τ, if the torpedo can catch the target.
pub(crate) fn intercept_time(d: Vector2<f64>, vt: Vector2<f64>, v: f64) -> Option<f64> {
    let a = vt.norm_squared() - v * v;
    let b = 2.0 * d.dot(&vt);
    let c = d.norm_squared();

    if c < EPS {
        return Some(0.0);
    }
    if a.abs() < EPS {
        return (b < 0.0).then(|| -c / b);
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let r1 = (-b - sq) / (2.0 * a);
    let r2 = (-b + sq) / (2.0 * a);
    [r1, r2]
        .into_iter()
        .filter(|t| t.is_finite() && *t >= 0.0)
        .reduce(f64::min)
}

// ---------------------------------------------------------------------------
// Angle solver linkage
// ---------------------------------------------------------------------------

/// The cams, resolvers and differentials of the angle solver section.
///
/// `evaluate` is a pure function of the trial gyro angle so the servo can
/// probe either side of it; `engage` does the same work and leaves every
/// part showing the result.
#[derive(Debug, Clone)]
pub struct Linkage {
    speed: f64,  // yards/s
    radius: f64, // yards
    max_run: f64,
    cam_reach: Cam,
    cam_48fa: Cam,
    cam_49fa: Cam,
    resolver_2fa: Resolver,
    resolver_16fa: Resolver,
    resolver_58fa: Resolver,
    diff_3fa: Differential,
    diff_18fa: Differential,
    diff_22fa: Differential,
}

impl Linkage {
    pub fn new(torpedo: &TorpedoSpec) -> Self {
        let radius = torpedo.turn_radius();
        let reach = torpedo.reach_yards;
        Self {
            speed: torpedo.speed_yps(),
            radius,
            max_run: torpedo.max_run_yards,
            cam_reach: Cam::constant("cam_P", "Reach cam (P)", reach),
            cam_48fa: Cam::new("cam_48FA", "Cam 48FA (transfer J)", move |g| {
                let g_abs = g.abs().to_radians();
                g.signum() * radius * (1.0 - g_abs.cos())
            }),
            cam_49fa: Cam::new("cam_49FA", "Cam 49FA (pseudo-run Us)", move |g| {
                let g_abs = g.abs().to_radians();
                radius * (g_abs - g_abs.sin())
            }),
            resolver_2fa: Resolver::new("resolver_2FA", "Resolver 2FA (G - Br)"),
            resolver_16fa: Resolver::new("resolver_16FA", "Resolver 16FA (I)"),
            resolver_58fa: Resolver::new("resolver_58FA", "Resolver 58FA (G)"),
            diff_3fa: Differential::subtract("diff_3FA", "Diff 3FA (XVII left side)"),
            diff_18fa: Differential::subtract("diff_18FA", "Diff 18FA (XVIII left side)"),
            diff_22fa: Differential::add("diff_22FA", "Diff 22FA (gyro angle)"),
        }
    }

    pub fn evaluate(&self, gyro: f64, inputs: &SolverInputs) -> Balance {
        let v = self.speed;
        let r = self.radius;
        let range = inputs.range;
        let g_abs = gyro.abs().to_radians();

        let p = self.cam_reach.eval(gyro);
        let j = self.cam_48fa.eval(gyro);
        let us = self.cam_49fa.eval(gyro);

        // End of the gyro turn in own-ship axes (x ahead, y to starboard).
        let turn_end = Vector2::new(p + r * g_abs.sin(), j);
        let turn_time = (p + r * g_abs) / v;

        let (sin_br, cos_br) = Resolver::resolve(inputs.relative_bearing);
        let target = Vector2::new(cos_br, sin_br) * range;
        let heading = inputs.relative_bearing + 180.0 - inputs.target_angle;
        let (sin_h, cos_h) = Resolver::resolve(heading);
        let s = knots_to_yps(inputs.target_speed);
        let vt = Vector2::new(cos_h, sin_h) * s;

        let offset = target + vt * turn_time - turn_end;
        let tau = intercept_time(offset, vt, v);
        let final_run = v * tau.unwrap_or_else(|| offset.norm() / v);

        let run = p + r * g_abs + final_run;
        let run_time = run / v;
        let target_travel = s * run_time;
        let lead = gyro - inputs.relative_bearing;
        let impact_angle = inputs.target_angle + lead;

        let (sin_lead, cos_lead) = Resolver::resolve(lead);
        let (sin_i, cos_i) = Resolver::resolve(impact_angle);
        let (sin_g, cos_g) = Resolver::resolve(gyro);

        let left_17 = self.diff_3fa.apply(range * cos_lead, target_travel * cos_i);
        let left_18 = self.diff_18fa.apply(range * sin_lead, target_travel * sin_i);
        let error_18 = left_18 - j - p * sin_g;
        // run - P - Us is the turn's advance along the final track plus F
        let error_17 = left_17 - p * cos_g - (run - p - us);

        let balance = Balance {
            gyro,
            lead,
            impact_angle,
            transfer: j,
            pseudo_run: us,
            final_run,
            run,
            run_time,
            target_travel,
            error_17,
            error_18,
            feasible: tau.is_some() && run <= self.max_run,
            wrong_branch: error_17 < -final_run,
        };

        if balance.is_finite() {
            balance
        } else {
            Balance { gyro, lead, impact_angle, ..Balance::default() }
        }
    }

    /// Evaluate at `gyro` and set every part to the result.
    pub fn engage(&mut self, gyro: f64, inputs: &SolverInputs) -> Balance {
        let b = self.evaluate(gyro, inputs);
        let range = if inputs.range.is_finite() { inputs.range } else { 0.0 };

        self.cam_reach.update(gyro);
        self.cam_48fa.update(gyro);
        self.cam_49fa.update(gyro);
        let (sin_lead, cos_lead) = self.resolver_2fa.update(b.lead);
        let (sin_i, cos_i) = self.resolver_16fa.update(b.impact_angle);
        self.resolver_58fa.update(gyro);
        self.diff_3fa.update(range * cos_lead, b.target_travel * cos_i);
        self.diff_18fa.update(range * sin_lead, b.target_travel * sin_i);
        self.diff_22fa.update(b.lead, inputs.relative_bearing);
        b
    }

    pub fn readings(&self) -> Vec<ComponentReading> {
        vec![
            self.resolver_2fa.reading(),
            self.resolver_16fa.reading(),
            self.resolver_58fa.reading(),
            self.cam_reach.reading(),
            self.cam_48fa.reading(),
            self.cam_49fa.reading(),
            self.diff_3fa.reading(),
            self.diff_18fa.reading(),
            self.diff_22fa.reading(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linkage() -> Linkage {
        Linkage::new(&TorpedoSpec::mark14_high())
    }

    #[test]
    fn intercept_of_stationary_point() {
        let t = intercept_time(Vector2::new(100.0, 0.0), Vector2::zeros(), 10.0).unwrap();
        assert_relative_eq!(t, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn no_intercept_of_faster_receding_target() {
        let t = intercept_time(Vector2::new(100.0, 0.0), Vector2::new(20.0, 0.0), 10.0);
        assert!(t.is_none());
    }

    #[test]
    fn equal_speed_head_on_meets_halfway() {
        let t = intercept_time(Vector2::new(100.0, 0.0), Vector2::new(-10.0, 0.0), 10.0).unwrap();
        assert_relative_eq!(t, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn straight_shot_at_stationary_target_balances() {
        let inputs = SolverInputs { relative_bearing: 0.0, target_angle: 180.0, range: 2000.0, target_speed: 0.0 };
        let b = linkage().evaluate(0.0, &inputs);
        assert_relative_eq!(b.error_18, 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.error_17, 0.0, epsilon = 1e-6);
        assert_relative_eq!(b.run, 2000.0, epsilon = 1e-6);
        assert!(b.is_valid());
    }

    #[test]
    fn error_17_closes_along_final_track() {
        let spec = TorpedoSpec::mark14_high();
        let inputs = SolverInputs { relative_bearing: 20.0, target_angle: 120.0, range: 3000.0, target_speed: 10.0 };
        let b = linkage().evaluate(25.0, &inputs);
        let advance = spec.turn_radius() * 25f64.to_radians().sin();
        let expected = 3000.0 * b.lead.to_radians().cos()
            - b.target_travel * b.impact_angle.to_radians().cos()
            - spec.reach_yards * 25f64.to_radians().cos()
            - advance
            - b.final_run;
        assert_relative_eq!(b.error_17, expected, epsilon = 1e-6);
    }

    #[test]
    fn transfer_cam_is_odd() {
        let l = linkage();
        assert_relative_eq!(l.cam_48fa.eval(30.0), -l.cam_48fa.eval(-30.0), epsilon = 1e-12);
        assert_relative_eq!(l.cam_49fa.eval(30.0), l.cam_49fa.eval(-30.0), epsilon = 1e-12);
        assert_eq!(l.cam_48fa.eval(0.0), 0.0);
    }

    #[test]
    fn target_astern_of_track_is_wrong_branch() {
        let inputs = SolverInputs { relative_bearing: 170.0, target_angle: 0.0, range: 1000.0, target_speed: 0.0 };
        let b = linkage().evaluate(0.0, &inputs);
        assert!(b.wrong_branch);
        assert!(!b.is_valid());
    }

    #[test]
    fn out_of_reach_is_infeasible() {
        let inputs = SolverInputs { relative_bearing: 0.0, target_angle: 180.0, range: 9000.0, target_speed: 0.0 };
        let b = linkage().evaluate(0.0, &inputs);
        assert!(!b.feasible);
    }

    #[test]
    fn non_finite_inputs_give_finite_invalid_balance() {
        let inputs = SolverInputs { relative_bearing: 0.0, target_angle: 0.0, range: f64::NAN, target_speed: 0.0 };
        let b = linkage().evaluate(10.0, &inputs);
        assert!(b.error_18.is_finite());
        assert!(!b.feasible);
    }

    #[test]
    fn engage_records_parts() {
        let mut l = linkage();
        let inputs = SolverInputs { relative_bearing: 20.0, target_angle: 120.0, range: 3000.0, target_speed: 10.0 };
        let b = l.engage(25.0, &inputs);
        let gyro = l.readings().into_iter().find(|r| r.id == "diff_22FA").unwrap();
        assert_relative_eq!(gyro.value, 25.0, epsilon = 1e-9);
        let left_18 = l.readings().into_iter().find(|r| r.id == "diff_18FA").unwrap();
        assert_relative_eq!(left_18.value - b.transfer - 75.0 * 25f64.to_radians().sin(), b.error_18, epsilon = 1e-6);
    }
}
