//! Barbell lift analysis from wrist-worn motion recordings.
//!
//! A recording holds accelerometer rows (g) and orientation rows (radians)
//! sampled at a quarter of the accelerometer rate. The pipeline aligns the
//! two streams, rotates each acceleration into the reference frame and adds
//! gravity back, smooths the result, then integrates velocity and vertical
//! power over a caller-chosen time window.

pub mod align;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod kinematics;
pub mod orientation;
pub mod pipeline;
pub mod smoothing;
pub mod types;

pub use config::{AnalysisConfig, BoundaryPolicy, LiftParameters};
pub use error::{LiftError, Result};
pub use ingest::{parse_recording, read_recording, Recording};
pub use pipeline::{analyze, preview, run, PipelineOutput, PipelineReport, Preview};
pub use types::{
    AccelSample, AlignedSample, AngleSample, CorrectedSample, KinematicSample, LiftSummary,
    SmoothedSample,
};
