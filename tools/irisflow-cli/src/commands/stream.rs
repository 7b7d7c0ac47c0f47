//! Loading landmark streams from disk.

use std::path::Path;

use irisflow_common::error::IrisflowError;
use irisflow_landmark_model::frame::{parse_frames, parse_header, FrameStreamHeader, LandmarkFrame};

/// A landmark stream read from a file.
pub struct LoadedStream {
    pub header: Option<FrameStreamHeader>,
    pub frames: Vec<LandmarkFrame>,
}

pub fn read_stream_text(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        return Err(IrisflowError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read stream {}: {e}", path.display()))
}

pub fn load_stream(path: &Path) -> anyhow::Result<LoadedStream> {
    let content = read_stream_text(path)?;
    let header =
        parse_header(&content).map_err(|e| anyhow::anyhow!("Failed to parse header: {e}"))?;
    let frames =
        parse_frames(&content).map_err(|e| anyhow::anyhow!("Failed to parse frames: {e}"))?;
    Ok(LoadedStream { header, frames })
}
