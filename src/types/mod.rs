pub mod linalg;

pub use linalg::*;

use serde::{Deserialize, Serialize};

/// Raw accelerometer row, acceleration in g
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccelSample {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelSample {
    pub fn new(time: f64, x: f64, y: f64, z: f64) -> Self {
        Self { time, x, y, z }
    }

    pub fn vector(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Raw orientation row, Euler angles in radians
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleSample {
    pub time: f64,
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

impl AngleSample {
    pub fn new(time: f64, pitch: f64, roll: f64, yaw: f64) -> Self {
        Self {
            time,
            pitch,
            roll,
            yaw,
        }
    }
}

/// One accelerometer row paired with the orientation held over it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignedSample {
    pub time: f64,
    pub accel: AccelSample,
    pub angles: AngleSample,
}

/// Aligned row with gravity-compensated acceleration (m/s²)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorrectedSample {
    pub aligned: AlignedSample,
    pub corrected: Vec3,
}

impl CorrectedSample {
    pub fn time(&self) -> f64 {
        self.aligned.time
    }
}

/// Corrected row plus its moving-average value.
///
/// `smoothed` is `None` near either end of the recording, where the
/// averaging window would run past the data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothedSample {
    pub sample: CorrectedSample,
    pub smoothed: Option<Vec3>,
}

impl SmoothedSample {
    pub fn time(&self) -> f64 {
        self.sample.time()
    }
}

/// Smoothed row plus integrated kinematics.
///
/// Kinematic fields are only set from the reset index up to the last sample
/// at or before the end of the analysis window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicSample {
    pub sample: SmoothedSample,
    pub velocity: Option<Vec3>,
    pub velocity_magnitude: Option<f64>,
    pub power: Option<f64>,
}

impl KinematicSample {
    pub fn time(&self) -> f64 {
        self.sample.time()
    }
}

/// Peak and mean statistics over the integrated window
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LiftSummary {
    pub peak_velocity: Option<f64>, // m/s
    pub peak_power: Option<f64>,    // W
    pub mean_velocity: Option<f64>, // m/s
    pub mean_power: Option<f64>,    // W
}
