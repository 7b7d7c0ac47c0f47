//! Per-frame, per-eye output records.
//!
//! Every processed frame yields exactly one [`EventRecord`] per eye. Numeric
//! fields are rounded to 3 decimals when the record is built, so two records
//! compare equal exactly when their rendered rows do.

use serde::{Deserialize, Serialize};

use irisflow_common::error::IrisflowError;

/// Column header of the CSV row contract.
pub const CSV_HEADER: &str = "frame,eyeIndex,x,y,z,vx,vy,vz,ratio,blinkCount,blinkDuration,fixationCount,fixationDuration,saccadeCount";

/// Which iris a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    /// 1-based index used in output rows.
    pub fn index(&self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Right => 2,
        }
    }

    /// 0-based slot for per-eye arrays.
    pub fn slot(&self) -> usize {
        self.index() as usize - 1
    }
}

impl From<Eye> for u8 {
    fn from(eye: Eye) -> u8 {
        eye.index()
    }
}

impl TryFrom<u8> for Eye {
    type Error = IrisflowError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Left),
            2 => Ok(Self::Right),
            other => Err(IrisflowError::invalid_input(format!(
                "eye index must be 1 or 2, got {other}"
            ))),
        }
    }
}

/// One output row for a (frame, eye) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// 1-based index of the processed frame within the session.
    pub frame: u64,
    #[serde(rename = "eyeIndex")]
    pub eye: Eye,

    /// Projected iris position.
    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// Head-compensated iris velocity; absent on the first frame.
    pub vx: Option<f64>,
    pub vy: Option<f64>,
    pub vz: Option<f64>,

    /// Cumulative vertical/horizontal ratio; absent until defined.
    pub ratio: Option<f64>,

    pub blink_count: u32,
    /// Interval credited on the frame a new blink starts, 0 otherwise.
    pub blink_duration: f64,
    pub fixation_count: u32,
    pub fixation_duration: f64,
    pub saccade_count: u32,
}

impl EventRecord {
    /// Velocity as a slice-friendly triple when present.
    pub fn velocity(&self) -> Option<[f64; 3]> {
        Some([self.vx?, self.vy?, self.vz?])
    }

    /// Render this record as one CSV row (no trailing newline).
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            self.frame,
            self.eye.index(),
            fmt3(self.x),
            fmt3(self.y),
            fmt3(self.z),
            fmt_opt(self.vx),
            fmt_opt(self.vy),
            fmt_opt(self.vz),
            fmt_opt(self.ratio),
            self.blink_count,
            fmt3(self.blink_duration),
            self.fixation_count,
            fmt3(self.fixation_duration),
            self.saccade_count,
        )
    }
}

/// Round to 3 decimals, half away from zero, with negative zero folded to zero.
pub fn round3(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn fmt3(value: f64) -> String {
    format!("{:.3}", round3(value))
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(fmt3).unwrap_or_default()
}

/// Render records as CSV, header first, one row per line.
pub fn write_csv(records: &[EventRecord]) -> String {
    let mut output = String::from(CSV_HEADER);
    output.push('\n');
    for record in records {
        output.push_str(&record.to_csv_row());
        output.push('\n');
    }
    output
}

/// Serialize records to JSONL.
pub fn serialize_records(records: &[EventRecord]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for record in records {
        output.push_str(&serde_json::to_string(record)?);
        output.push('\n');
    }
    Ok(output)
}
