//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{PoiseError, PoiseResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Video decoding settings.
    pub media: MediaConfig,

    /// Landmark detector model locations.
    pub landmarks: LandmarkConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "poise=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

/// Which library decodes video frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaBackend {
    /// `ffmpeg` subprocess piping raw BGR frames.
    #[default]
    Ffmpeg,
    /// OpenCV `VideoCapture` (requires the `opencv` feature).
    Opencv,
}

impl MediaBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ffmpeg => "ffmpeg",
            Self::Opencv => "opencv",
        }
    }
}

impl std::str::FromStr for MediaBackend {
    type Err = PoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ffmpeg" => Ok(Self::Ffmpeg),
            "opencv" => Ok(Self::Opencv),
            other => Err(PoiseError::config(format!(
                "unknown media backend '{other}' (expected ffmpeg or opencv)"
            ))),
        }
    }
}

/// Video decoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Frame source backend.
    pub backend: MediaBackend,

    /// ffmpeg executable name or path.
    pub ffmpeg_bin: String,

    /// ffprobe executable name or path.
    pub ffprobe_bin: String,
}

/// Model files for the OpenCV landmark provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfig {
    /// Haar cascade XML used for face detection.
    pub cascade_path: Option<PathBuf>,

    /// LBF facemark model (68-point `lbfmodel.yaml`).
    pub facemark_model_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            backend: MediaBackend::Ffmpeg,
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
        }
    }
}

impl LandmarkConfig {
    /// Both model paths, if the OpenCV provider is fully configured.
    pub fn opencv_models(&self) -> Option<(&PathBuf, &PathBuf)> {
        match (&self.cascade_path, &self.facemark_model_path) {
            (Some(cascade), Some(model)) => Some((cascade, model)),
            _ => None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Check values that would otherwise fail deep inside a run.
    pub fn validate(&self) -> PoiseResult<()> {
        if self.media.ffmpeg_bin.trim().is_empty() {
            return Err(PoiseError::config("media.ffmpeg_bin must not be empty"));
        }
        if self.media.ffprobe_bin.trim().is_empty() {
            return Err(PoiseError::config("media.ffprobe_bin must not be empty"));
        }
        let partial = self.landmarks.cascade_path.is_some()
            != self.landmarks.facemark_model_path.is_some();
        if partial {
            return Err(PoiseError::config(
                "landmarks.cascade_path and landmarks.facemark_model_path must be set together",
            ));
        }
        Ok(())
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
    base.join("poise").join("config.json")
}
