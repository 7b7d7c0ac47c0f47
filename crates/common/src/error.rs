//! Error types shared across Irisflow crates.

use std::path::PathBuf;

/// Top-level error type for Irisflow operations.
#[derive(Debug, thiserror::Error)]
pub enum IrisflowError {
    /// Input rejected before it reaches the pipeline (wrong landmark count,
    /// non-finite coordinates, ...).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using IrisflowError.
pub type IrisflowResult<T> = Result<T, IrisflowError>;

impl IrisflowError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: msg.into(),
        }
    }
}
