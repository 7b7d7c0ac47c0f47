//! Replay a landmark stream and export event records.

use std::path::PathBuf;

use irisflow_common::config::AppConfig;
use irisflow_kinematics::{replay, EyeStateMode, KinematicsConfig};
use irisflow_landmark_model::record::{serialize_records, write_csv};

use super::stream::load_stream;

pub struct AnalyzeArgs {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub format: String,
    pub frame_rate: Option<f64>,
    pub blink_threshold: Option<f64>,
    pub fixation_threshold: Option<f64>,
    pub saccade_threshold: Option<f64>,
    pub shared_classifiers: bool,
    pub no_depth_compensation: bool,
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Csv,
    Jsonl,
}

fn parse_format(format: &str) -> anyhow::Result<OutputFormat> {
    match format.to_ascii_lowercase().as_str() {
        "csv" => Ok(OutputFormat::Csv),
        "jsonl" => Ok(OutputFormat::Jsonl),
        other => anyhow::bail!("Unknown output format '{other}'. Use csv or jsonl."),
    }
}

/// Layer CLI overrides over the configured defaults.
fn build_config(
    app: &AppConfig,
    args: &AnalyzeArgs,
    header_frame_rate: Option<f64>,
) -> KinematicsConfig {
    let mut config = KinematicsConfig::from_defaults(&app.pipeline);
    if let Some(rate) = args.frame_rate.or(header_frame_rate) {
        config.frame_rate = rate;
    }
    if let Some(threshold) = args.blink_threshold {
        config.blink_threshold = threshold;
    }
    if let Some(threshold) = args.fixation_threshold {
        config.fixation_threshold = threshold;
    }
    if let Some(threshold) = args.saccade_threshold {
        config.saccade_threshold = threshold;
    }
    if args.shared_classifiers {
        config.eye_state_mode = EyeStateMode::Shared;
    }
    if args.no_depth_compensation {
        config.compensate_depth = false;
    }
    config
}

pub fn run(app: &AppConfig, args: AnalyzeArgs) -> anyhow::Result<()> {
    let format = parse_format(&args.format)?;
    let stream = load_stream(&args.path)?;
    let config = build_config(
        app,
        &args,
        stream.header.as_ref().map(|h| h.frame_rate),
    );

    tracing::info!(
        frames = stream.frames.len(),
        frame_rate = config.frame_rate,
        mode = ?config.eye_state_mode,
        "replaying landmark stream"
    );

    let mut session =
        replay(config, &stream.frames).map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    if let Some(header) = &stream.header {
        session = session.with_source(header.source);
    }

    let rendered = match format {
        OutputFormat::Csv => write_csv(session.records()),
        OutputFormat::Jsonl => serialize_records(session.records())
            .map_err(|e| anyhow::anyhow!("Failed to serialize records: {e}"))?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
            eprintln!(
                "Wrote {} records to {}",
                session.records().len(),
                path.display()
            );
        }
        None => print!("{rendered}"),
    }

    let summary = session.summary(chrono::Utc::now());
    eprintln!(
        "Frames: {} processed, {} skipped",
        summary.frames_processed, summary.frames_skipped
    );
    eprintln!("Blinks: {}", summary.blink_count);
    eprintln!(
        "Fixations: left {}, right {}",
        summary.fixation_counts[0], summary.fixation_counts[1]
    );
    eprintln!(
        "Saccades: left {}, right {}",
        summary.saccade_counts[0], summary.saccade_counts[1]
    );
    eprintln!("Ratio: {}", summary.ratio_label());

    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| anyhow::anyhow!("Failed to serialize summary: {e}"))?;
        std::fs::write(path, json)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
        eprintln!("Summary saved to: {}", path.display());
    }

    Ok(())
}
