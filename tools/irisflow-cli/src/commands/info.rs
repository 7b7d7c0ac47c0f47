//! Show landmark stream information.

use std::path::PathBuf;

use super::stream::load_stream;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let stream = load_stream(&path)?;

    println!("Stream: {}", path.display());
    match &stream.header {
        Some(header) => {
            println!("  Schema version: {}", header.schema_version);
            println!("  Source: {}", header.source.as_str());
            println!("  Frame rate: {} Hz", header.frame_rate);
            if let Some(epoch) = &header.epoch_wall {
                println!("  Started: {epoch}");
            }
        }
        None => println!("  Header: none"),
    }
    println!();

    let frames = &stream.frames;
    let faces: usize = frames.iter().map(|f| f.faces.len()).sum();
    let with_face = frames.iter().filter(|f| !f.faces.is_empty()).count();

    println!("Frames:");
    println!("  Total: {}", frames.len());
    println!("  With a face: {with_face}");
    println!("  Faces detected: {faces}");
    if let (Some(first), Some(last)) = (frames.first(), frames.last()) {
        let span_secs = last.t_ms.saturating_sub(first.t_ms) as f64 / 1000.0;
        println!(
            "  Time span: {}ms .. {}ms ({span_secs:.2}s)",
            first.t_ms, last.t_ms
        );
        if frames.len() > 1 && span_secs > 0.0 {
            println!(
                "  Observed rate: {:.2} Hz",
                (frames.len() - 1) as f64 / span_secs
            );
        }
    }

    Ok(())
}
