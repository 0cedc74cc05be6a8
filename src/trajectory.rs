use nalgebra::Vector2;

use crate::angles::{heading_vector, normalize_degrees};
use crate::config::TorpedoSpec;

const SEGMENTS_PER_PHASE: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Reach,
    Turn,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub time: f64,             // s after launch
    pub position: Vector2<f64>, // yards from the launch point, x = East, y = North
    pub phase: Phase,
}

/// Torpedo path after launch: a straight reach along own course, a turn at
/// constant radius through the gyro angle, then a straight run to the end.
#[derive(Debug, Clone, PartialEq)]
pub struct TorpedoTrajectory {
    pub launch_heading: f64, // deg true
    pub final_heading: f64,  // deg true
    pub gyro: f64,
    pub turn_radius: f64,
    pub turn_center: Vector2<f64>,
    pub reach: f64,     // yards
    pub turn_arc: f64,  // yards
    pub final_run: f64, // yards
    pub reach_time: f64,
    pub turn_time: f64,
    pub final_time: f64,
    pub points: Vec<TrajectoryPoint>,
}

fn unit(heading: f64) -> Vector2<f64> {
    let (east, north) = heading_vector(heading);
    Vector2::new(east, north)
}

impl TorpedoTrajectory {
    /// `run` is the total path length; anything the reach and turn don't use
    /// goes to the final straight.
    pub fn compute(own_course: f64, gyro: f64, torpedo: &TorpedoSpec, run: f64) -> Self {
        let v = torpedo.speed_yps();
        let r = torpedo.turn_radius();
        let side = if gyro < 0.0 { -1.0 } else { 1.0 };
        let g_abs = gyro.abs();

        let reach = torpedo.reach_yards;
        let turn_arc = r * g_abs.to_radians();
        let final_run = (run - reach - turn_arc).max(0.0);

        let turn_start = unit(own_course) * reach;
        let turn_center = turn_start + unit(own_course + side * 90.0) * r;
        let on_turn = |theta: f64| turn_center + unit(own_course + side * (theta - 90.0)) * r;
        let final_heading = normalize_degrees(own_course + gyro);
        let turn_end = on_turn(g_abs);

        let reach_time = reach / v;
        let turn_time = turn_arc / v;
        let final_time = final_run / v;

        let n = SEGMENTS_PER_PHASE as f64;
        let mut points = Vec::with_capacity(3 * SEGMENTS_PER_PHASE + 1);
        for i in 0..SEGMENTS_PER_PHASE {
            let f = i as f64 / n;
            points.push(TrajectoryPoint { time: f * reach_time, position: turn_start * f, phase: Phase::Reach });
        }
        for i in 0..SEGMENTS_PER_PHASE {
            let f = i as f64 / n;
            points.push(TrajectoryPoint {
                time: reach_time + f * turn_time,
                position: on_turn(f * g_abs),
                phase: Phase::Turn,
            });
        }
        let final_dir = unit(final_heading);
        for i in 0..=SEGMENTS_PER_PHASE {
            let f = i as f64 / n;
            points.push(TrajectoryPoint {
                time: reach_time + turn_time + f * final_time,
                position: turn_end + final_dir * (f * final_run),
                phase: Phase::Final,
            });
        }

        Self {
            launch_heading: normalize_degrees(own_course),
            final_heading,
            gyro,
            turn_radius: r,
            turn_center,
            reach,
            turn_arc,
            final_run,
            reach_time,
            turn_time,
            final_time,
            points,
        }
    }

    pub fn total_time(&self) -> f64 {
        self.reach_time + self.turn_time + self.final_time
    }

    pub fn total_run(&self) -> f64 {
        self.reach + self.turn_arc + self.final_run
    }

    /// Where the run ends, relative to the launch point.
    pub fn end_point(&self) -> Vector2<f64> {
        self.points.last().map(|p| p.position).unwrap_or_else(Vector2::zeros)
    }
}
