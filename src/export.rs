use std::io::{self, Write};

use crate::types::{KinematicSample, Vec3};

pub const TRACE_HEADER: &str = "Time,x,y,z,pitch,roll,yaw,x_corr,y_corr,z_corr,\
x_velocity,y_velocity,z_velocity,velocity_magnitude,power";

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn vector_cells(value: Option<Vec3>) -> [String; 3] {
    [
        cell(value.map(|v| v.x)),
        cell(value.map(|v| v.y)),
        cell(value.map(|v| v.z)),
    ]
}

/// Write the enriched per-sample table as CSV.
///
/// `x_corr..z_corr` hold the smoothed acceleration; undefined values
/// (smoothing boundary, outside the lift window) are left empty.
pub fn write_trace_csv<W: Write>(writer: &mut W, samples: &[KinematicSample]) -> io::Result<()> {
    writeln!(writer, "{TRACE_HEADER}")?;
    for sample in samples {
        let aligned = &sample.sample.sample.aligned;
        let [x_corr, y_corr, z_corr] = vector_cells(sample.sample.smoothed);
        let [x_vel, y_vel, z_vel] = vector_cells(sample.velocity);
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            aligned.time,
            aligned.accel.x,
            aligned.accel.y,
            aligned.accel.z,
            aligned.angles.pitch,
            aligned.angles.roll,
            aligned.angles.yaw,
            x_corr,
            y_corr,
            z_corr,
            x_vel,
            y_vel,
            z_vel,
            cell(sample.velocity_magnitude),
            cell(sample.power),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccelSample, AlignedSample, AngleSample, CorrectedSample, SmoothedSample};

    fn sample(velocity: Option<Vec3>) -> KinematicSample {
        let aligned = AlignedSample {
            time: 0.5,
            accel: AccelSample::new(0.5, 0.0, 0.0, 1.0),
            angles: AngleSample::new(0.5, 0.0, 0.0, 0.0),
        };
        KinematicSample {
            sample: SmoothedSample {
                sample: CorrectedSample {
                    aligned,
                    corrected: Vec3::new(0.0, 0.0, 19.62),
                },
                smoothed: None,
            },
            velocity,
            velocity_magnitude: velocity.map(|v| v.norm()),
            power: velocity.map(|v| v.z * 10.0),
        }
    }

    #[test]
    fn test_trace_csv_layout() {
        let mut out = Vec::new();
        write_trace_csv(
            &mut out,
            &[sample(None), sample(Some(Vec3::new(0.0, 0.0, 2.0)))],
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], TRACE_HEADER);
        assert_eq!(lines[1], "0.5,0,0,1,0,0,0,,,,,,,,");
        assert_eq!(lines[2], "0.5,0,0,1,0,0,0,,,,0,0,2,2,20");
        assert_eq!(lines[0].split(',').count(), lines[2].split(',').count());
    }
}
