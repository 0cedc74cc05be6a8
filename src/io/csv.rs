use std::io::{self, Write};

use crate::sim::TdcOutputs;
use crate::trajectory::{Phase, TorpedoTrajectory};

/// Write one row per output sample.
///
/// Columns: time, bearing, range, rel_bearing, target_angle, gyro, lead,
///          error_17, error_18, servo_rate, run, run_time, track_angle,
///          generated_range, feasible, solved
pub fn write_samples<W: Write>(writer: &mut W, samples: &[TdcOutputs]) -> io::Result<()> {
    writeln!(
        writer,
        "time,bearing,range,rel_bearing,target_angle,gyro,lead,\
         error_17,error_18,servo_rate,run,run_time,track_angle,\
         generated_range,feasible,solved"
    )?;

    for s in samples {
        writeln!(
            writer,
            "{:.2},{:.3},{:.1},{:.3},{:.3},{:.4},{:.4},\
             {:.2},{:.2},{:.4},{:.1},{:.2},{:.2},\
             {:.1},{},{}",
            s.time,
            s.bearing, s.range, s.relative_bearing, s.target_angle,
            s.gyro_angle, s.lead_angle,
            s.error_17, s.error_18, s.servo_rate,
            s.run, s.run_time, s.track_angle,
            s.generated_range,
            u8::from(s.feasible),
            u8::from(s.solved),
        )?;
    }

    Ok(())
}

/// Write the sampled torpedo path. Positions are yards East/North of the
/// launch point.
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &TorpedoTrajectory) -> io::Result<()> {
    writeln!(writer, "time,x,y,phase")?;
    for p in &trajectory.points {
        let phase = match p.phase {
            Phase::Reach => "reach",
            Phase::Turn => "turn",
            Phase::Final => "final",
        };
        writeln!(writer, "{:.2},{:.1},{:.1},{}", p.time, p.position.x, p.position.y, phase)?;
    }
    Ok(())
}

/// Write output samples to a CSV file at the given path.
pub fn write_samples_file(path: &str, samples: &[TdcOutputs]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_samples(&mut file, samples)
}

pub fn write_trajectory_file(path: &str, trajectory: &TorpedoTrajectory) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TorpedoSpec;

    #[test]
    fn samples_have_header_and_rows() {
        let samples = vec![
            TdcOutputs { range: 3000.0, gyro_angle: 30.0, ..Default::default() },
            TdcOutputs { time: 0.1, range: 2999.0, gyro_angle: 30.5, solved: true, ..Default::default() },
        ];

        let mut buf = Vec::new();
        write_samples(&mut buf, &samples).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.00,"));
        assert!(lines[2].ends_with(",1"));
        assert_eq!(lines[0].split(',').count(), lines[1].split(',').count());
    }

    #[test]
    fn trajectory_rows_carry_phase() {
        let t = TorpedoTrajectory::compute(0.0, 30.0, &TorpedoSpec::mark14_high(), 2000.0);
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &t).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert_eq!(output.lines().count(), t.points.len() + 1);
        assert!(output.contains(",turn"));
        assert!(output.lines().last().unwrap().ends_with(",final"));
    }
}
