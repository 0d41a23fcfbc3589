//! Two-section recording reader.
//!
//! A recording is one text file holding the accelerometer table followed by
//! the orientation table. The orientation table starts at the first line
//! that mentions pitch, roll and yaw.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::error::{LiftError, Result};
use crate::types::{AccelSample, AngleSample};

const ACCEL_TABLE: &str = "acceleration";
const ANGLE_TABLE: &str = "orientation";

/// Row counts from ingestion
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    pub accel_rows: usize,
    pub angle_rows: usize,
    pub malformed_accel_rows: usize,
    pub malformed_angle_rows: usize,
}

impl IngestStats {
    pub fn malformed_rows(&self) -> usize {
        self.malformed_accel_rows + self.malformed_angle_rows
    }
}

/// Parsed recording with both streams in file order
#[derive(Clone, Debug, Default)]
pub struct Recording {
    pub accel: Vec<AccelSample>,
    pub angles: Vec<AngleSample>,
    pub stats: IngestStats,
}

impl Recording {
    pub fn new(accel: Vec<AccelSample>, angles: Vec<AngleSample>) -> Self {
        let stats = IngestStats {
            accel_rows: accel.len(),
            angle_rows: angles.len(),
            ..IngestStats::default()
        };
        Self {
            accel,
            angles,
            stats,
        }
    }
}

/// Read a recording from disk, gunzipping when the extension is `gz`
pub fn read_recording(path: &Path) -> Result<Recording> {
    let file = File::open(path)?;
    let mut text = String::new();
    if path.extension().map(|e| e == "gz").unwrap_or(false) {
        let mut reader = BufReader::new(GzDecoder::new(file));
        reader.read_to_string(&mut text)?;
    } else {
        let mut reader = BufReader::new(file);
        reader.read_to_string(&mut text)?;
    }
    parse_recording(&text)
}

fn is_orientation_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("pitch") && lower.contains("roll") && lower.contains("yaw")
}

/// Split the file into (acceleration section, orientation section).
///
/// The orientation section includes its header line.
pub fn split_sections(text: &str) -> Result<(&str, &str)> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if is_orientation_header(line) {
            return Ok((&text[..offset], &text[offset..]));
        }
        offset += line.len();
    }
    Err(LiftError::MissingSection)
}

/// Column positions resolved once from a section header
struct Schema<const N: usize> {
    indices: [usize; N],
    width: usize,
}

impl<const N: usize> Schema<N> {
    fn resolve(
        header: &str,
        table: &'static str,
        columns: [&'static str; N],
    ) -> Result<Self> {
        let names: Vec<String> = header
            .split(',')
            .map(|name| name.trim().to_lowercase())
            .collect();

        let mut indices = [0usize; N];
        for (slot, column) in indices.iter_mut().zip(columns) {
            *slot = names
                .iter()
                .position(|name| name.eq_ignore_ascii_case(column))
                .ok_or(LiftError::MissingField { table, column })?;
        }
        let width = indices.iter().copied().max().map_or(0, |max| max + 1);
        Ok(Self { indices, width })
    }

    /// Parse the schema's columns from one data row; `None` if the row is malformed
    fn parse_row(&self, line: &str) -> Option<[f64; N]> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < self.width {
            return None;
        }
        let mut values = [0.0; N];
        for (value, &idx) in values.iter_mut().zip(self.indices.iter()) {
            let parsed: f64 = fields[idx].parse().ok()?;
            if parsed.is_nan() {
                return None;
            }
            *value = parsed;
        }
        Some(values)
    }
}

/// Parse one section into typed rows, returning (rows, malformed count)
fn parse_section<T, const N: usize>(
    section: &str,
    table: &'static str,
    columns: [&'static str; N],
    build: impl Fn([f64; N]) -> T,
) -> Result<(Vec<T>, usize)> {
    let mut lines = section.lines().filter(|line| !line.trim().is_empty());
    let header = lines.next().ok_or(LiftError::MissingField {
        table,
        column: columns[0],
    })?;
    let schema = Schema::resolve(header, table, columns)?;

    let mut rows = Vec::new();
    let mut malformed = 0usize;
    for line in lines {
        match schema.parse_row(line) {
            Some(values) => rows.push(build(values)),
            None => malformed += 1,
        }
    }
    Ok((rows, malformed))
}

/// Parse a full two-section recording
pub fn parse_recording(text: &str) -> Result<Recording> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let (accel_section, angle_section) = split_sections(text)?;

    let (accel, malformed_accel_rows) = parse_section(
        accel_section,
        ACCEL_TABLE,
        ["time", "x", "y", "z"],
        |[time, x, y, z]| AccelSample::new(time, x, y, z),
    )?;
    let (angles, malformed_angle_rows) = parse_section(
        angle_section,
        ANGLE_TABLE,
        ["time", "pitch", "roll", "yaw"],
        |[time, pitch, roll, yaw]| AngleSample::new(time, pitch, roll, yaw),
    )?;

    let stats = IngestStats {
        accel_rows: accel.len(),
        angle_rows: angles.len(),
        malformed_accel_rows,
        malformed_angle_rows,
    };

    if stats.malformed_rows() > 0 {
        log::warn!(
            "[ingest] dropped malformed rows: {} acceleration, {} orientation",
            malformed_accel_rows,
            malformed_angle_rows
        );
    }
    log::info!(
        "[ingest] {} acceleration rows, {} orientation rows",
        stats.accel_rows,
        stats.angle_rows
    );

    Ok(Recording {
        accel,
        angles,
        stats,
    })
}
