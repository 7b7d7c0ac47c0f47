//! Validate a landmark stream.

use std::path::PathBuf;

use irisflow_kinematics::geometry::project_irises;
use irisflow_landmark_model::frame::{frame_lines, parse_frame_line, parse_header};

use super::stream::read_stream_text;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating stream at: {}", path.display());

    let content = read_stream_text(&path)?;
    let mut issues = Vec::new();

    match parse_header(&content) {
        Ok(Some(header)) => {
            println!("  Schema version: {}", header.schema_version);
            println!("  Frame rate: {} Hz", header.frame_rate);
        }
        Ok(None) => println!("  Header: none"),
        Err(e) => issues.push(e.to_string()),
    }

    let mut frames = 0usize;
    let mut no_face = 0usize;
    let mut multi_face = 0usize;
    let mut degenerate = Vec::new();
    let mut last_t_ms = None;

    for (line_number, line) in frame_lines(&content) {
        let frame = match parse_frame_line(line_number, line) {
            Ok(frame) => frame,
            Err(e) => {
                issues.push(e.to_string());
                continue;
            }
        };
        frames += 1;

        if last_t_ms.is_some_and(|last| frame.t_ms < last) {
            issues.push(format!(
                "Line {line_number}: timestamp {} goes backwards",
                frame.t_ms
            ));
        }
        last_t_ms = Some(frame.t_ms);

        match frame.faces.len() {
            0 => no_face += 1,
            1 => {}
            _ => multi_face += 1,
        }
        if let Some(face) = frame.primary_face() {
            if project_irises(face).is_err() {
                degenerate.push(line_number);
            }
        }
    }

    println!("  Frames: {frames}");
    println!("  Frames without a face: {no_face}");
    println!("  Frames with extra faces (ignored): {multi_face}");
    println!("  Frames with degenerate geometry: {}", degenerate.len());
    for line_number in degenerate.iter().take(10) {
        println!("    - line {line_number}");
    }

    if issues.is_empty() {
        println!("\nStream is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Invalid lines are rejected by analyze.",
            issues.len()
        );
    }

    Ok(())
}
