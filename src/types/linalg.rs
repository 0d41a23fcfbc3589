//! Linear algebra aliases and fixed physical constants for the lift pipeline.

use nalgebra::{Rotation3, Vector3};

/// Standard gravity used for g → m/s² scaling and power (m/s²)
pub const GRAVITY: f64 = 9.81;

/// Accelerometer samples per orientation sample
pub const RESAMPLE_RATIO: usize = 4;

/// Centered moving-average window (samples)
pub const SMOOTHING_WINDOW: usize = 50;

pub type Vec3 = Vector3<f64>;
pub type Rot3 = Rotation3<f64>;

/// Gravity vector added back after rotation, world frame
pub fn gravity_vector() -> Vec3 {
    Vec3::new(0.0, 0.0, GRAVITY)
}
