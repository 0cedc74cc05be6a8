use tdc_sim::{presets, Tdc, TdcInputs};

/// Track a zig-zagging convoy ship: the target changes course mid-run and
/// the computer re-solves without being reset.
fn main() {
    env_logger::init();

    let scenario = presets::convoy_attack();
    let mut tdc = match Tdc::new(scenario.config.clone()) {
        Ok(tdc) => tdc.with_inputs(scenario.inputs),
        Err(e) => {
            eprintln!("bad config: {}", e);
            return;
        }
    };

    println!("{:>6}  {:>7}  {:>7}  {:>7}  {:>8}  {}", "t (s)", "B", "R", "G", "E18", "state");
    for second in 0..=120 {
        if second == 60 {
            // zig: target comes 40° to port; observed bearing and range
            // are re-entered from the present solution
            let now = *tdc.outputs();
            println!("-- target zigs to {:.0}°", scenario.inputs.target_course - 40.0);
            tdc.set_inputs(TdcInputs {
                target_bearing: now.bearing,
                target_range: now.range,
                target_course: scenario.inputs.target_course - 40.0,
                ..scenario.inputs
            });
        }

        let out = *tdc.outputs();
        if second % 10 == 0 {
            println!(
                "{:>6.0}  {:>7.1}  {:>7.0}  {:>7.2}  {:>8.1}  {}",
                out.time,
                out.bearing,
                out.range,
                out.gyro_angle,
                out.error_18,
                if out.solved { "SOLUTION" } else { "hunting" }
            );
        }
        tdc.step(1.0);
    }
}
