//! Error types shared across Poise crates.

use std::path::PathBuf;

/// Top-level error type for Poise operations.
#[derive(Debug, thiserror::Error)]
pub enum PoiseError {
    /// The frame source could not be opened (missing file, unsupported codec).
    #[error("Failed to open video source {path}: {message}")]
    SourceOpen { path: PathBuf, message: String },

    /// No frame in the whole video produced a detected face.
    #[error("No face detected in any of the {frames_read} frames read; cannot compute averages")]
    EmptyAggregate { frames_read: u64 },

    #[error("Eye landmark error: {message}")]
    EyeLandmarks { message: String },

    #[error("Landmark error: {message}")]
    Landmarks { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PoiseError.
pub type PoiseResult<T> = Result<T, PoiseError>;

impl PoiseError {
    pub fn source_open(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::SourceOpen {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn eye_landmarks(msg: impl Into<String>) -> Self {
        Self::EyeLandmarks {
            message: msg.into(),
        }
    }

    pub fn landmarks(msg: impl Into<String>) -> Self {
        Self::Landmarks {
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether this error is fatal for a whole video run.
    ///
    /// Per-frame problems (bad landmarks, a provider hiccup) are skipped by the
    /// aggregator; only these two abort the run.
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, Self::SourceOpen { .. } | Self::EmptyAggregate { .. })
    }
}
