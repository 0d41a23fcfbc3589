//! Gravity compensation from per-sample Euler angles.
//!
//! Each sample's acceleration is scaled from g to m/s², rotated by its
//! orientation and offset by the world-frame gravity vector:
//!
//! ```text
//! corrected = Rz(yaw) · Rx(pitch) · Ry(roll) · (9.81 · a) + (0, 0, 9.81)
//! ```
//!
//! The rotation is the extrinsic "y, x, z" sequence (roll about Y first,
//! then pitch about X, then yaw about Z).

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{LiftError, Result};
use crate::types::{
    gravity_vector, AlignedSample, AngleSample, CorrectedSample, Rot3, Vec3, GRAVITY,
};

/// Why a sample could not be corrected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationFailure {
    NonFiniteAngle,
    NonFiniteAcceleration,
    NonFiniteResult,
}

/// Per-sample correction result
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Correction {
    Valid(Vec3),
    Invalid(RotationFailure),
}

impl Correction {
    pub fn is_valid(&self) -> bool {
        matches!(self, Correction::Valid(_))
    }
}

/// Rejected-sample counts by reason
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationRejections {
    pub non_finite_angle: usize,
    pub non_finite_acceleration: usize,
    pub non_finite_result: usize,
}

impl RotationRejections {
    fn record(&mut self, failure: RotationFailure) {
        match failure {
            RotationFailure::NonFiniteAngle => self.non_finite_angle += 1,
            RotationFailure::NonFiniteAcceleration => self.non_finite_acceleration += 1,
            RotationFailure::NonFiniteResult => self.non_finite_result += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.non_finite_angle + self.non_finite_acceleration + self.non_finite_result
    }
}

/// Surviving samples plus what was dropped
#[derive(Clone, Debug)]
pub struct CorrectionOutcome {
    pub samples: Vec<CorrectedSample>,
    pub rejected: RotationRejections,
}

/// Sensor-to-reference rotation for one orientation sample
pub fn rotation_from_angles(angles: &AngleSample) -> std::result::Result<Rot3, RotationFailure> {
    if !(angles.roll.is_finite() && angles.pitch.is_finite() && angles.yaw.is_finite()) {
        return Err(RotationFailure::NonFiniteAngle);
    }
    let roll = Rot3::from_axis_angle(&Vector3::y_axis(), angles.roll);
    let pitch = Rot3::from_axis_angle(&Vector3::x_axis(), angles.pitch);
    let yaw = Rot3::from_axis_angle(&Vector3::z_axis(), angles.yaw);
    Ok(yaw * pitch * roll)
}

/// Correct a single aligned sample
pub fn correct_sample(sample: &AlignedSample) -> Correction {
    let raw = sample.accel.vector();
    if raw.iter().any(|v| !v.is_finite()) {
        return Correction::Invalid(RotationFailure::NonFiniteAcceleration);
    }
    let rotation = match rotation_from_angles(&sample.angles) {
        Ok(rotation) => rotation,
        Err(failure) => return Correction::Invalid(failure),
    };

    let corrected = rotation * (raw * GRAVITY) + gravity_vector();
    if corrected.iter().any(|v| !v.is_finite()) {
        return Correction::Invalid(RotationFailure::NonFiniteResult);
    }
    Correction::Valid(corrected)
}

/// Correct every sample; the result is parallel to the input
pub fn correct(aligned: &[AlignedSample]) -> Vec<Correction> {
    aligned.iter().map(correct_sample).collect()
}

/// Drop invalid samples, failing if none survive
pub fn apply_corrections(
    aligned: &[AlignedSample],
    corrections: &[Correction],
) -> Result<CorrectionOutcome> {
    let mut rejected = RotationRejections::default();
    let mut samples = Vec::with_capacity(aligned.len());

    for (sample, correction) in aligned.iter().zip(corrections) {
        match *correction {
            Correction::Valid(corrected) => samples.push(CorrectedSample {
                aligned: *sample,
                corrected,
            }),
            Correction::Invalid(failure) => rejected.record(failure),
        }
    }

    log::info!(
        "[orientation] valid corrected accelerations: {} of {}",
        samples.len(),
        aligned.len()
    );
    if rejected.total() > 0 {
        log::warn!(
            "[orientation] rejected {} samples (angle: {}, acceleration: {}, result: {})",
            rejected.total(),
            rejected.non_finite_angle,
            rejected.non_finite_acceleration,
            rejected.non_finite_result
        );
    }

    if samples.is_empty() {
        return Err(LiftError::NoValidData {
            total: aligned.len(),
        });
    }

    Ok(CorrectionOutcome { samples, rejected })
}

/// Correct and filter in one pass
pub fn correct_orientation(aligned: &[AlignedSample]) -> Result<CorrectionOutcome> {
    let corrections = correct(aligned);
    apply_corrections(aligned, &corrections)
}
