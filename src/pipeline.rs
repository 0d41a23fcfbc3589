//! Full lift analysis: align → correct orientation → smooth → integrate.
//!
//! Every stage takes the previous stage's table by reference and returns a
//! new one. Row counts at each boundary go into the `PipelineReport`.

use serde::Serialize;

use crate::align::align;
use crate::config::{BoundaryPolicy, LiftParameters};
use crate::error::Result;
use crate::ingest::{IngestStats, Recording};
use crate::kinematics::integrate;
use crate::orientation::{correct_orientation, RotationRejections};
use crate::smoothing::{smooth, MovingAverage};
use crate::types::{KinematicSample, LiftSummary, SmoothedSample};

/// Row counts and rejections per stage
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub ingest: IngestStats,
    pub aligned_samples: usize,
    pub corrected_samples: usize,
    pub rotation_rejections: RotationRejections,
    pub smoothed_samples: usize,
    pub reset_index: Option<usize>,
    pub integrated_samples: usize,
    pub boundary_samples: usize,
    pub backward_steps: usize,
}

/// Stages 1-3 over the whole recording
#[derive(Clone, Debug)]
pub struct Preview {
    pub samples: Vec<SmoothedSample>,
    pub report: PipelineReport,
}

impl Preview {
    /// Time span covered by the corrected trace
    pub fn time_span(&self) -> Option<(f64, f64)> {
        let first = self.samples.first()?.time();
        let last = self.samples.last()?.time();
        Some((first, last))
    }
}

#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub samples: Vec<KinematicSample>,
    pub summary: LiftSummary,
    pub report: PipelineReport,
}

#[derive(Serialize)]
struct SummaryExport<'a> {
    summary: &'a LiftSummary,
    report: &'a PipelineReport,
}

impl PipelineOutput {
    /// Summary and stage report as pretty JSON
    pub fn summary_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&SummaryExport {
            summary: &self.summary,
            report: &self.report,
        })
    }
}

/// Align, correct and smooth the recording without integrating
pub fn preview(recording: &Recording) -> Result<Preview> {
    let aligned = align(&recording.accel, &recording.angles);
    let corrected = correct_orientation(&aligned)?;
    let smoothed = smooth(&corrected.samples, &MovingAverage::default());

    let report = PipelineReport {
        ingest: recording.stats,
        aligned_samples: aligned.len(),
        corrected_samples: corrected.samples.len(),
        rotation_rejections: corrected.rejected,
        smoothed_samples: smoothed.len(),
        ..PipelineReport::default()
    };

    Ok(Preview {
        samples: smoothed,
        report,
    })
}

/// Integrate a previewed recording over the lift window
pub fn analyze(
    preview: Preview,
    params: &LiftParameters,
    policy: BoundaryPolicy,
) -> Result<PipelineOutput> {
    let Preview {
        samples: smoothed,
        mut report,
    } = preview;
    let integration = integrate(&smoothed, params, policy)?;

    report.reset_index = Some(integration.reset_index);
    report.integrated_samples = integration.integrated_samples;
    report.boundary_samples = integration.boundary_samples;
    report.backward_steps = integration.backward_steps;

    log::info!(
        "[pipeline] {} rows read, {} aligned, {} corrected, {} integrated",
        report.ingest.accel_rows,
        report.aligned_samples,
        report.corrected_samples,
        report.integrated_samples
    );

    Ok(PipelineOutput {
        samples: integration.samples,
        summary: integration.summary,
        report,
    })
}

/// Run every stage and integrate over the lift window
pub fn run(
    recording: &Recording,
    params: &LiftParameters,
    policy: BoundaryPolicy,
) -> Result<PipelineOutput> {
    params.validate()?;
    analyze(preview(recording)?, params, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LiftError;
    use crate::types::{AccelSample, AngleSample};

    fn recording(n: usize, angle: f64) -> Recording {
        let accel = (0..n)
            .map(|i| AccelSample::new(i as f64 * 0.01, 0.0, 0.0, 1.0))
            .collect();
        let angles = (0..n.div_ceil(4))
            .map(|i| AngleSample::new(i as f64 * 0.04, angle, 0.0, 0.0))
            .collect();
        Recording::new(accel, angles)
    }

    #[test]
    fn test_report_counts_each_stage() {
        let output = run(
            &recording(120, 0.0),
            &LiftParameters::new(0.295, 0.8, 60.0),
            BoundaryPolicy::Corrected,
        )
        .unwrap();

        let report = &output.report;
        assert_eq!(report.ingest.accel_rows, 120);
        assert_eq!(report.aligned_samples, 120);
        assert_eq!(report.corrected_samples, 120);
        assert_eq!(report.smoothed_samples, 120);
        assert_eq!(report.reset_index, Some(30));
        assert_eq!(report.backward_steps, 0);
        assert_eq!(output.samples.len(), 120);
    }

    #[test]
    fn test_all_rotations_failing_aborts() {
        let err = run(
            &recording(16, f64::NAN),
            &LiftParameters::new(0.0, 0.1, 60.0),
            BoundaryPolicy::Corrected,
        )
        .unwrap_err();
        assert!(matches!(err, LiftError::NoValidData { total: 16 }));
    }

    #[test]
    fn test_bad_time_range_is_distinct() {
        let err = run(
            &recording(16, 0.0),
            &LiftParameters::new(99.0, 100.0, 60.0),
            BoundaryPolicy::Corrected,
        )
        .unwrap_err();
        assert!(matches!(err, LiftError::UnsatisfiableRange { .. }));
    }

    #[test]
    fn test_preview_span() {
        let preview = preview(&recording(10, 0.0)).unwrap();
        let (first, last) = preview.time_span().unwrap();
        assert_eq!(first, 0.0);
        assert!((last - 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_summary_json_has_stats() {
        let output = run(
            &recording(60, 0.0),
            &LiftParameters::new(0.0, 0.5, 40.0),
            BoundaryPolicy::Corrected,
        )
        .unwrap();
        let json = output.summary_json().unwrap();
        assert!(json.contains("peak_velocity"));
        assert!(json.contains("corrected_samples"));
    }
}
