//! Landmark frame streams.
//!
//! Streams are stored as JSONL: an optional `# {header}` comment line
//! followed by one [`LandmarkFrame`] object per line. Blank lines and other
//! `#` comment lines are ignored.

use serde::{Deserialize, Serialize};

use irisflow_common::error::{IrisflowError, IrisflowResult};

use crate::landmarks::LandmarkSet;

/// Current stream schema version.
pub const STREAM_SCHEMA_VERSION: &str = "1.0";

/// Where a stream of frames came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestSource {
    /// Real-time camera feed.
    Live,
    /// Frames sampled from a recorded video.
    #[default]
    Recorded,
}

impl IngestSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Recorded => "recorded",
        }
    }
}

/// Metadata written as the first (comment) line of a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Capture frame rate declared by the landmark producer (Hz).
    pub frame_rate: f64,

    /// Live or recorded ingestion.
    #[serde(default)]
    pub source: IngestSource,

    /// Wall-clock time at stream start (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch_wall: Option<String>,
}

impl FrameStreamHeader {
    pub fn new(frame_rate: f64, source: IngestSource) -> Self {
        Self {
            schema_version: STREAM_SCHEMA_VERSION.to_string(),
            frame_rate,
            source,
            epoch_wall: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}

/// Landmark sets detected in one frame, with its timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Milliseconds since stream start.
    pub t_ms: u64,

    /// Zero or more detected faces, in detector order.
    #[serde(default)]
    pub faces: Vec<LandmarkSet>,
}

impl LandmarkFrame {
    pub fn new(t_ms: u64, faces: Vec<LandmarkSet>) -> Self {
        Self { t_ms, faces }
    }

    /// The face a single-subject session follows.
    pub fn primary_face(&self) -> Option<&LandmarkSet> {
        self.faces.first()
    }
}

/// Iterate over the data lines of a stream as `(line_number, text)` pairs.
///
/// Line numbers are 1-based and count every physical line.
pub fn frame_lines(jsonl: &str) -> impl Iterator<Item = (usize, &str)> {
    jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parse a single frame line, tagging failures with its line number.
pub fn parse_frame_line(line_number: usize, line: &str) -> IrisflowResult<LandmarkFrame> {
    serde_json::from_str(line).map_err(|e| IrisflowError::parse(line_number, e.to_string()))
}

/// Parse all frames from JSONL content.
pub fn parse_frames(jsonl: &str) -> IrisflowResult<Vec<LandmarkFrame>> {
    frame_lines(jsonl)
        .map(|(n, line)| parse_frame_line(n, line))
        .collect()
}

/// Extract the header from the first line, if the stream has one.
pub fn parse_header(jsonl: &str) -> IrisflowResult<Option<FrameStreamHeader>> {
    let Some(first) = jsonl.lines().next() else {
        return Ok(None);
    };
    let Some(json) = first.trim().strip_prefix('#') else {
        return Ok(None);
    };
    serde_json::from_str(json.trim())
        .map(Some)
        .map_err(|e| IrisflowError::parse(1, format!("invalid stream header: {e}")))
}

/// Serialize a stream, writing the header as a leading comment line.
pub fn serialize_frames(
    header: Option<&FrameStreamHeader>,
    frames: &[LandmarkFrame],
) -> IrisflowResult<String> {
    let mut output = String::new();
    if let Some(header) = header {
        output.push_str("# ");
        output.push_str(&serde_json::to_string(header)?);
        output.push('\n');
    }
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
