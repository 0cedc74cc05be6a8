use tdc_sim::solver::GyroServo;
use tdc_sim::{presets, Tdc};

/// A servo with no momentum: it runs at a fixed speed toward the
/// correction and stops inside a dead band.
struct BangBangServo {
    speed: f64,
    dead_band: f64,
    rate: f64,
}

impl GyroServo for BangBangServo {
    fn drive(&mut self, correction: f64, _solved: bool, dt: f64) -> f64 {
        self.rate = if correction.abs() < self.dead_band {
            0.0
        } else {
            // never overshoot within one tick
            (correction / dt).clamp(-self.speed, self.speed)
        };
        self.rate
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn halt(&mut self) {
        self.rate = 0.0;
    }

    fn name(&self) -> &str {
        "BangBang"
    }
}

fn main() {
    env_logger::init();

    let scenario = presets::deflection_shot();
    let servo = BangBangServo { speed: 10.0, dead_band: 0.05, rate: 0.0 };
    let mut tdc = match Tdc::with_servo(scenario.config.clone(), Box::new(servo)) {
        Ok(tdc) => tdc.with_inputs(scenario.inputs),
        Err(e) => {
            eprintln!("bad config: {}", e);
            return;
        }
    };

    println!("Solving '{}' with {} servo...", scenario.name, tdc.servo_name());
    let mut solved_at = None;
    for _ in 0..300 {
        let out = tdc.step(0.1);
        if out.solved && solved_at.is_none() {
            solved_at = Some(out.time);
        }
    }

    let out = tdc.outputs();
    match solved_at {
        Some(t) => println!("Solution at {:.1} s", t),
        None => println!("No solution"),
    }
    println!("Gyro angle: {:.2}°  (lead {:.2}°)", out.gyro_angle, out.lead_angle);
    println!("Run: {:.0} yd in {:.1} s", out.run, out.run_time);
    println!("Error XVIII: {:.1} yd", out.error_18);
}
