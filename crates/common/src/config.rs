//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{IrisflowError, IrisflowResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default pipeline parameters.
    pub pipeline: PipelineDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default kinematics pipeline parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineDefaults {
    /// Nominal capture rate used for velocity and duration scaling (Hz).
    pub frame_rate: f64,

    /// Eyelid gap (normalized landmark units) below which an eye counts as closed.
    pub blink_threshold: f64,

    /// Iris speed below which gaze counts as fixating (units/sec).
    pub fixation_threshold: f64,

    /// Iris speed above which gaze counts as a saccade (units/sec).
    pub saccade_threshold: f64,

    /// Track fixation/saccade state per eye instead of one shared instance.
    pub per_eye_classifiers: bool,

    /// Subtract head translation on the depth axis as well as X/Y.
    pub compensate_depth: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "irisflow_kinematics=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for PipelineDefaults {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            blink_threshold: 0.0165,
            fixation_threshold: 0.1,
            saccade_threshold: 0.8,
            per_eye_classifiers: true,
            compensate_depth: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location.
    ///
    /// A missing file yields defaults. An unreadable or malformed file is an
    /// error so the caller can report it once logging is up.
    pub fn load() -> IrisflowResult<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load config from `path`, with defaults when the file does not exist.
    pub fn load_from(path: &Path) -> IrisflowResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| IrisflowError::config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("irisflow").join("config.json")
}
