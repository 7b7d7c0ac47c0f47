//! Write a synthetic landmark stream.

use std::path::PathBuf;

use irisflow_landmark_model::frame::{serialize_frames, FrameStreamHeader, IngestSource};
use irisflow_landmark_model::synthetic::SyntheticStream;

pub fn run(
    output: PathBuf,
    frames: usize,
    frame_rate: f64,
    blink_every: usize,
    saccade_every: usize,
    dropout_every: usize,
) -> anyhow::Result<()> {
    if !(frame_rate.is_finite() && frame_rate > 0.0) {
        anyhow::bail!("Frame rate must be positive, got {frame_rate}");
    }

    let params = SyntheticStream {
        frames,
        frame_rate,
        blink_every,
        saccade_every,
        dropout_every,
    };
    let generated = params
        .generate()
        .map_err(|e| anyhow::anyhow!("Failed to generate frames: {e}"))?;

    let header = FrameStreamHeader::new(frame_rate, IngestSource::Recorded);
    let jsonl = serialize_frames(Some(&header), &generated)
        .map_err(|e| anyhow::anyhow!("Failed to serialize frames: {e}"))?;
    std::fs::write(&output, jsonl)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;

    tracing::info!(frames = generated.len(), path = %output.display(), "synthetic stream written");
    println!("Wrote {} frames to {}", generated.len(), output.display());
    Ok(())
}
