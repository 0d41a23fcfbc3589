//! Lift kinematics: velocity by forward-Euler integration and vertical power
//!
//! Physics:
//!   v[reset] = 0
//!   v[i]     = v[i-1] + a[i] × (t[i] - t[i-1])   while t[i] <= end_time
//!   P[i]     = m × g × v_z[i]
//!
//! `a` is the smoothed, gravity-compensated acceleration (m/s²). Power only
//! uses the vertical component: the load's weight times its vertical speed.

use crate::config::{BoundaryPolicy, LiftParameters};
use crate::error::{LiftError, Result};
use crate::types::{KinematicSample, LiftSummary, SmoothedSample, Vec3, GRAVITY};

/// Integrated trace plus where integration started and stopped
#[derive(Clone, Debug)]
pub struct Integration {
    pub samples: Vec<KinematicSample>,
    pub summary: LiftSummary,
    pub reset_index: usize,
    /// Samples that received a velocity, reset sample included
    pub integrated_samples: usize,
    /// Integrated samples whose smoothed acceleration was undefined
    pub boundary_samples: usize,
    /// Integrated steps whose time went backwards
    pub backward_steps: usize,
}

/// Per-sample time step; the first sample's step is zero
pub fn time_deltas(samples: &[SmoothedSample]) -> Vec<f64> {
    let mut deltas = Vec::with_capacity(samples.len());
    let mut previous: Option<f64> = None;
    for sample in samples {
        let t = sample.time();
        deltas.push(previous.map_or(0.0, |prev| t - prev));
        previous = Some(t);
    }
    deltas
}

/// Index of the first sample at or after `start_time`
pub fn reset_index(samples: &[SmoothedSample], start_time: f64) -> Result<usize> {
    samples
        .iter()
        .position(|s| s.time() >= start_time)
        .ok_or_else(|| LiftError::UnsatisfiableRange {
            start_time,
            last_time: samples.last().map(SmoothedSample::time),
        })
}

/// Vertical power from load and velocity (W)
pub fn vertical_power(mass_kg: f64, z_velocity: f64) -> f64 {
    mass_kg * GRAVITY * z_velocity
}

fn integration_accel(sample: &SmoothedSample, policy: BoundaryPolicy) -> (Vec3, bool) {
    match (sample.smoothed, policy) {
        (Some(accel), _) => (accel, false),
        (None, BoundaryPolicy::Corrected) => (sample.sample.corrected, true),
        (None, BoundaryPolicy::Hold) => (Vec3::zeros(), true),
    }
}

fn peak(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Peak and mean over the defined velocity magnitudes and powers
pub fn summarize(samples: &[KinematicSample]) -> LiftSummary {
    let speeds: Vec<f64> = samples.iter().filter_map(|s| s.velocity_magnitude).collect();
    let powers: Vec<f64> = samples.iter().filter_map(|s| s.power).collect();

    LiftSummary {
        peak_velocity: peak(&speeds),
        peak_power: peak(&powers),
        mean_velocity: mean(&speeds),
        mean_power: mean(&powers),
    }
}

/// Integrate smoothed acceleration into velocity and power
pub fn integrate(
    samples: &[SmoothedSample],
    params: &LiftParameters,
    policy: BoundaryPolicy,
) -> Result<Integration> {
    params.validate()?;

    let deltas = time_deltas(samples);
    let reset = reset_index(samples, params.start_time)?;

    let mut velocities: Vec<Option<Vec3>> = vec![None; samples.len()];
    let mut velocity = Vec3::zeros();
    velocities[reset] = Some(velocity);
    let mut integrated_samples = 1usize;
    let mut boundary_samples = 0usize;
    let mut backward_steps = 0usize;

    for i in (reset + 1)..samples.len() {
        if samples[i].time() > params.end_time {
            break;
        }
        let (accel, on_boundary) = integration_accel(&samples[i], policy);
        if on_boundary {
            boundary_samples += 1;
        }
        if deltas[i] < 0.0 {
            backward_steps += 1;
        }
        velocity += accel * deltas[i];
        velocities[i] = Some(velocity);
        integrated_samples += 1;
    }

    let kinematic: Vec<KinematicSample> = samples
        .iter()
        .zip(velocities)
        .map(|(sample, velocity)| KinematicSample {
            sample: *sample,
            velocity,
            velocity_magnitude: velocity.map(|v| v.norm()),
            power: velocity.map(|v| vertical_power(params.mass_kg, v.z)),
        })
        .collect();

    let summary = summarize(&kinematic);

    log::info!(
        "[kinematics] reset at index {} (t={:.3}s), integrated {} samples up to t={:.3}s",
        reset,
        samples[reset].time(),
        integrated_samples,
        samples[reset + integrated_samples - 1].time()
    );
    if boundary_samples > 0 {
        log::warn!(
            "[kinematics] {} integrated samples had no smoothed acceleration ({:?} policy)",
            boundary_samples,
            policy
        );
    }
    if backward_steps > 0 {
        log::warn!(
            "[kinematics] time went backwards at {} integrated samples; recording is out of order",
            backward_steps
        );
    }

    Ok(Integration {
        samples: kinematic,
        summary,
        reset_index: reset,
        integrated_samples,
        boundary_samples,
        backward_steps,
    })
}
