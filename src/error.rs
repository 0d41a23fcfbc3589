use std::path::PathBuf;

use thiserror::Error;

/// Fatal lift analysis errors.
///
/// Per-row problems (malformed rows, failed rotations) never show up here;
/// they are dropped and counted in the stage reports instead.
#[derive(Error, Debug)]
pub enum LiftError {
    #[error("No valid accelerations to process: all {total} samples failed orientation correction")]
    NoValidData { total: usize },

    #[error("Missing column '{column}' in {table} table")]
    MissingField { table: &'static str, column: &'static str },

    #[error("No orientation section found (expected a header row with pitch, roll and yaw)")]
    MissingSection,

    #[error("No sample at or after start time {start_time}s (last sample at {last_time:?}s)")]
    UnsatisfiableRange {
        start_time: f64,
        last_time: Option<f64>,
    },

    #[error("Invalid parameter {name}: {value} (must be finite)")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Failed to read recording: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = LiftError::MissingField {
            table: "acceleration",
            column: "Time",
        };
        assert!(err.to_string().contains("'Time'"));
        assert!(err.to_string().contains("acceleration"));

        let err = LiftError::UnsatisfiableRange {
            start_time: 12.5,
            last_time: Some(3.0),
        };
        assert!(err.to_string().contains("12.5"));

        let err = LiftError::InvalidParameter {
            name: "barbell_weight_kg",
            value: f64::NAN,
        };
        assert!(err.to_string().contains("barbell_weight_kg"));
    }

    #[test]
    fn test_config_read_names_the_file() {
        let err = LiftError::ConfigRead {
            path: PathBuf::from("lift.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("lift.json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LiftError = io.into();
        assert!(matches!(err, LiftError::Io(_)));
    }
}
