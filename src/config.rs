//! Analysis configuration.
//!
//! Everything here can come from a JSON file (`AnalysisConfig::from_json_file`)
//! and be overridden by command-line flags in the `lift_tracker` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LiftError, Result};

/// Analysis window and barbell load
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiftParameters {
    pub start_time: f64, // s
    pub end_time: f64,   // s
    pub mass_kg: f64,
}

impl LiftParameters {
    pub fn new(start_time: f64, end_time: f64, mass_kg: f64) -> Self {
        Self {
            start_time,
            end_time,
            mass_kg,
        }
    }

    /// All three values must be finite. `end_time <= start_time` is allowed;
    /// it just leaves the reset sample as the only integrated one.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("start_time", self.start_time),
            ("end_time", self.end_time),
            ("barbell_weight_kg", self.mass_kg),
        ] {
            if !value.is_finite() {
                return Err(LiftError::InvalidParameter { name, value });
            }
        }
        if self.end_time <= self.start_time {
            log::warn!(
                "[config] end time {}s is not after start time {}s",
                self.end_time,
                self.start_time
            );
        }
        Ok(())
    }
}

/// Acceleration used where the moving average has no full window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Integrate the unsmoothed corrected acceleration
    #[default]
    Corrected,
    /// Contribute no acceleration; velocity is carried forward
    Hold,
}

impl FromStr for BoundaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "corrected" => Ok(BoundaryPolicy::Corrected),
            "hold" => Ok(BoundaryPolicy::Hold),
            other => Err(format!(
                "unknown boundary policy '{other}' (expected 'corrected' or 'hold')"
            )),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub barbell_weight_kg: Option<f64>,
    pub boundary_policy: BoundaryPolicy,
    /// Where to write the per-sample trace CSV, if anywhere
    pub trace_output: Option<PathBuf>,
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| LiftError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json_str(&text)?)
    }

    /// Lift parameters, if all three are configured
    pub fn lift_parameters(&self) -> Option<LiftParameters> {
        Some(LiftParameters::new(
            self.start_time?,
            self.end_time?,
            self.barbell_weight_kg?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(LiftParameters::new(0.0, 1.0, 60.0).validate().is_ok());

        let err = LiftParameters::new(0.0, 1.0, f64::NAN).validate().unwrap_err();
        assert!(matches!(
            err,
            LiftError::InvalidParameter {
                name: "barbell_weight_kg",
                ..
            }
        ));

        let err = LiftParameters::new(f64::INFINITY, 1.0, 60.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            LiftError::InvalidParameter {
                name: "start_time",
                ..
            }
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config = AnalysisConfig::from_json_str(
            r#"{"start_time": 1.5, "end_time": 3.0, "barbell_weight_kg": 80, "boundary_policy": "hold"}"#,
        )
        .unwrap();
        assert_eq!(config.boundary_policy, BoundaryPolicy::Hold);
        assert_eq!(
            config.lift_parameters(),
            Some(LiftParameters::new(1.5, 3.0, 80.0))
        );
        assert!(config.trace_output.is_none());
    }

    #[test]
    fn test_partial_config_has_no_lift_parameters() {
        let config = AnalysisConfig::from_json_str(r#"{"start_time": 1.5}"#).unwrap();
        assert_eq!(config.boundary_policy, BoundaryPolicy::Corrected);
        assert!(config.lift_parameters().is_none());
    }

    #[test]
    fn test_config_file_errors_are_typed() {
        let missing = AnalysisConfig::from_json_file(Path::new("/nonexistent/lift.json"));
        assert!(matches!(missing, Err(LiftError::ConfigRead { .. })));

        let path = std::env::temp_dir().join(format!("lift_config_{}.json", std::process::id()));
        fs::write(&path, r#"{"boundary_policy": "nearest"}"#).unwrap();
        let invalid = AnalysisConfig::from_json_file(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(invalid, Err(LiftError::Config(_))));
    }

    #[test]
    fn test_boundary_policy_from_str() {
        assert_eq!("HOLD".parse::<BoundaryPolicy>(), Ok(BoundaryPolicy::Hold));
        assert!("nearest".parse::<BoundaryPolicy>().is_err());
    }
}
