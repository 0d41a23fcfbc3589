use crate::types::{CorrectedSample, SmoothedSample, Vec3, SMOOTHING_WINDOW};

/// Centered simple moving average over a fixed window
#[derive(Clone, Copy, Debug)]
pub struct MovingAverage {
    window_size: usize,
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new(SMOOTHING_WINDOW)
    }
}

impl MovingAverage {
    /// Create a smoother with the given window size (50 for lift recordings)
    pub fn new(window_size: usize) -> Self {
        MovingAverage {
            window_size: window_size.max(1),
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Samples before the center that fall inside the window
    fn lead(&self) -> usize {
        self.window_size / 2
    }

    /// Range of input indices averaged for output index `i`, if fully inside the channel
    fn window_bounds(&self, i: usize, len: usize) -> Option<(usize, usize)> {
        let start = i.checked_sub(self.lead())?;
        let end = start + self.window_size;
        (end <= len).then_some((start, end))
    }

    /// Smooth one channel.
    ///
    /// Output `i` averages `[i - W/2, i - W/2 + W)`, i.e. 25 samples before
    /// and 24 after for W = 50. Indices without a full window are `None`.
    pub fn apply(&self, channel: &[f64]) -> Vec<Option<f64>> {
        (0..channel.len())
            .map(|i| {
                self.window_bounds(i, channel.len())
                    .map(|(start, end)| window_mean(&channel[start..end]))
            })
            .collect()
    }
}

/// Mean of a non-empty window.
///
/// Deviations from the first sample are summed with Neumaier compensation,
/// so a constant window returns its value bit for bit.
fn window_mean(window: &[f64]) -> f64 {
    let base = window[0];
    let mut sum = 0.0;
    let mut compensation = 0.0;
    for &value in window {
        let deviation = value - base;
        let t = sum + deviation;
        if sum.abs() >= deviation.abs() {
            compensation += (sum - t) + deviation;
        } else {
            compensation += (deviation - t) + sum;
        }
        sum = t;
    }
    base + (sum + compensation) / window.len() as f64
}

/// Smooth one channel with the standard window
pub fn moving_average(channel: &[f64], window_size: usize) -> Vec<Option<f64>> {
    MovingAverage::new(window_size).apply(channel)
}

/// Smooth the x, y and z corrected channels independently
pub fn smooth(samples: &[CorrectedSample], smoother: &MovingAverage) -> Vec<SmoothedSample> {
    let channel = |axis: usize| -> Vec<Option<f64>> {
        let values: Vec<f64> = samples.iter().map(|s| s.corrected[axis]).collect();
        smoother.apply(&values)
    };
    let (xs, ys, zs) = (channel(0), channel(1), channel(2));

    let smoothed: Vec<SmoothedSample> = samples
        .iter()
        .enumerate()
        .map(|(i, sample)| SmoothedSample {
            sample: *sample,
            smoothed: match (xs[i], ys[i], zs[i]) {
                (Some(x), Some(y), Some(z)) => Some(Vec3::new(x, y, z)),
                _ => None,
            },
        })
        .collect();

    let defined = smoothed.iter().filter(|s| s.smoothed.is_some()).count();
    log::info!(
        "[smoothing] window {}: {} of {} samples have a full window",
        smoother.window_size(),
        defined,
        smoothed.len()
    );

    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_channel_stays_constant() {
        let channel = vec![2.5; 120];
        let result = moving_average(&channel, SMOOTHING_WINDOW);
        assert_eq!(result.len(), 120);
        for value in result.iter().flatten() {
            assert_eq!(*value, 2.5);
        }
    }

    #[test]
    fn test_inexact_constants_stay_constant() {
        for c in [0.1, 1.0 / 3.0, 19.62, -7.77, 1e-300] {
            let result = moving_average(&vec![c; 120], SMOOTHING_WINDOW);
            assert_eq!(result.iter().flatten().count(), 71);
            for value in result.iter().flatten() {
                assert_eq!(*value, c, "constant {c} drifted");
            }
        }
    }

    #[test]
    fn test_boundaries_are_undefined() {
        let channel: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let result = moving_average(&channel, 50);

        // Defined for 25..=75: 25 samples before and 24 after must exist
        assert!(result[24].is_none());
        assert!(result[25].is_some());
        assert!(result[75].is_some());
        assert!(result[76].is_none());
        assert_eq!(result.iter().flatten().count(), 51);
    }

    #[test]
    fn test_window_is_25_before_24_after() {
        let channel: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let result = moving_average(&channel, 50);
        // mean of 0..=49 is 24.5
        assert!((result[25].unwrap() - 24.5).abs() < 1e-12);
    }

    #[test]
    fn test_short_channel_all_undefined() {
        let result = moving_average(&[1.0; 10], 50);
        assert!(result.iter().all(Option::is_none));
    }

    #[test]
    fn test_odd_window() {
        let result = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(result, vec![None, Some(2.0), Some(3.0), Some(4.0), None]);
    }
}
