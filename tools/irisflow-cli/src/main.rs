//! Irisflow CLI: command-line interface for landmark stream analysis.
//!
//! Usage:
//!   irisflow analyze <PATH>    Replay a stream and export event records
//!   irisflow validate <PATH>   Validate a landmark stream
//!   irisflow info <PATH>       Show stream information
//!   irisflow synth <PATH>      Write a synthetic landmark stream
//!   irisflow config            Show or write the configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use irisflow_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "irisflow",
    about = "Oculomotor kinematics from face landmark streams",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a landmark stream and export per-eye event records
    Analyze {
        /// Path to the landmark stream (JSONL)
        path: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: csv|jsonl
        #[arg(long, default_value = "csv")]
        format: String,

        /// Capture frame rate (Hz); defaults to the stream header, then the config
        #[arg(long)]
        frame_rate: Option<f64>,

        /// Eyelid gap below which an eye counts as closed
        #[arg(long)]
        blink_threshold: Option<f64>,

        /// Iris speed below which an eye counts as fixating
        #[arg(long)]
        fixation_threshold: Option<f64>,

        /// Iris speed above which an eye counts as saccading
        #[arg(long)]
        saccade_threshold: Option<f64>,

        /// Share one fixation/saccade state between both eyes (legacy exports)
        #[arg(long)]
        shared_classifiers: bool,

        /// Compensate head translation on x/y only
        #[arg(long)]
        no_depth_compensation: bool,

        /// Write a session summary (JSON) to this path
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Validate a landmark stream
    Validate {
        /// Path to the landmark stream (JSONL)
        path: PathBuf,
    },

    /// Show stream information
    Info {
        /// Path to the landmark stream (JSONL)
        path: PathBuf,
    },

    /// Write a deterministic synthetic landmark stream
    Synth {
        /// Output file path
        output: PathBuf,

        /// Number of frames
        #[arg(long, default_value = "300")]
        frames: usize,

        /// Declared frame rate (Hz)
        #[arg(long, default_value = "30")]
        frame_rate: f64,

        /// Start a blink every N frames (0 disables)
        #[arg(long, default_value = "90")]
        blink_every: usize,

        /// Jump gaze every N frames (0 disables)
        #[arg(long, default_value = "45")]
        saccade_every: usize,

        /// Drop the face from every N-th frame (0 disables)
        #[arg(long, default_value = "0")]
        dropout_every: usize,
    },

    /// Print the effective configuration
    Config {
        /// Save it to the configuration file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    irisflow_common::logging::init_logging(&logging);
    if let Some(e) = &config_error {
        tracing::warn!(error = %e, "Falling back to default configuration");
    }

    match cli.command {
        Commands::Analyze {
            path,
            output,
            format,
            frame_rate,
            blink_threshold,
            fixation_threshold,
            saccade_threshold,
            shared_classifiers,
            no_depth_compensation,
            summary,
        } => commands::analyze::run(
            &config,
            commands::analyze::AnalyzeArgs {
                path,
                output,
                format,
                frame_rate,
                blink_threshold,
                fixation_threshold,
                saccade_threshold,
                shared_classifiers,
                no_depth_compensation,
                summary,
            },
        ),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Info { path } => commands::info::run(path),
        Commands::Synth {
            output,
            frames,
            frame_rate,
            blink_every,
            saccade_every,
            dropout_every,
        } => commands::synth::run(
            output,
            frames,
            frame_rate,
            blink_every,
            saccade_every,
            dropout_every,
        ),
        Commands::Config { write } => {
            commands::config::run(&config, write, config_error.is_some())
        }
    }
}
