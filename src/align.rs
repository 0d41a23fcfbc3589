use crate::types::{AccelSample, AlignedSample, AngleSample, RESAMPLE_RATIO};

/// Pair each accelerometer row with the orientation row covering it.
///
/// Orientation is held constant over `RESAMPLE_RATIO` accelerometer rows and
/// matched by position, not timestamp. Output length is
/// `min(accel.len(), RESAMPLE_RATIO * angles.len())`.
pub fn align(accel: &[AccelSample], angles: &[AngleSample]) -> Vec<AlignedSample> {
    let held = angles
        .iter()
        .flat_map(|angle| std::iter::repeat(*angle).take(RESAMPLE_RATIO));

    let aligned: Vec<AlignedSample> = accel
        .iter()
        .zip(held)
        .map(|(accel, angles)| AlignedSample {
            time: accel.time,
            accel: *accel,
            angles,
        })
        .collect();

    if aligned.len() < accel.len() {
        log::warn!(
            "[align] orientation stream covers {} of {} acceleration rows, truncating",
            aligned.len(),
            accel.len()
        );
    }
    log::debug!(
        "[align] {} acceleration + {} orientation rows -> {} aligned",
        accel.len(),
        angles.len(),
        aligned.len()
    );

    aligned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accel_stream(n: usize) -> Vec<AccelSample> {
        (0..n)
            .map(|i| AccelSample::new(i as f64 * 0.01, 0.0, 0.0, 1.0))
            .collect()
    }

    fn angle_stream(m: usize) -> Vec<AngleSample> {
        (0..m)
            .map(|i| AngleSample::new(i as f64 * 0.04, i as f64, 0.0, 0.0))
            .collect()
    }

    #[test]
    fn test_length_is_min_of_streams() {
        for (n, m) in [(8, 2), (10, 2), (7, 2), (8, 5), (0, 3), (5, 0)] {
            let aligned = align(&accel_stream(n), &angle_stream(m));
            assert_eq!(aligned.len(), n.min(RESAMPLE_RATIO * m), "n={n} m={m}");
        }
    }

    #[test]
    fn test_orientation_held_over_four_rows() {
        let aligned = align(&accel_stream(9), &angle_stream(3));
        let pitches: Vec<f64> = aligned.iter().map(|s| s.angles.pitch).collect();
        assert_eq!(pitches, vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_keeps_accel_time() {
        let aligned = align(&accel_stream(6), &angle_stream(2));
        assert_eq!(aligned[5].time, aligned[5].accel.time);
        assert_eq!(aligned[5].angles.time, 0.04);
    }
}
