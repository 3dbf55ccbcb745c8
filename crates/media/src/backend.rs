//! Backend selection for frame sources and landmark providers.

use std::path::Path;
use std::process::{Command, Stdio};

use poise_analysis_core::source::{FrameSource, LandmarkProvider};
use poise_common::config::{LandmarkConfig, MediaBackend, MediaConfig};
use poise_common::error::{PoiseError, PoiseResult};
use poise_signal_model::landmark::FaceTopology;
use poise_signal_model::track::FrameIndex;

use crate::ffmpeg::FfmpegFrameSource;
use crate::track::TrackLandmarkProvider;

/// Open `path` with the configured backend.
pub fn open_source(path: &Path, config: &MediaConfig) -> PoiseResult<Box<dyn FrameSource>> {
    tracing::debug!(
        path = %path.display(),
        backend = config.backend.as_str(),
        "Opening frame source"
    );

    match config.backend {
        MediaBackend::Ffmpeg => Ok(Box::new(FfmpegFrameSource::open(path, config)?)),
        MediaBackend::Opencv => open_opencv_source(path),
    }
}

#[cfg(feature = "opencv")]
fn open_opencv_source(path: &Path) -> PoiseResult<Box<dyn FrameSource>> {
    Ok(Box::new(crate::cv::OpenCvFrameSource::open(path)?))
}

#[cfg(not(feature = "opencv"))]
fn open_opencv_source(_path: &Path) -> PoiseResult<Box<dyn FrameSource>> {
    Err(PoiseError::unsupported(
        "the opencv backend is not compiled in; rebuild with --features opencv",
    ))
}

/// A landmark provider ready to drive a run.
pub struct SelectedProvider {
    pub provider: Box<dyn LandmarkProvider>,
    /// Layout of the landmarks the provider returns.
    pub topology: FaceTopology,
    /// Last frame with a record, when replaying a track.
    pub track_last_frame: Option<FrameIndex>,
}

/// Pick a landmark provider and the topology its landmarks follow.
///
/// A recorded track wins when given. Otherwise the OpenCV facemark provider
/// is used if it is compiled in and both model paths are configured.
pub fn landmark_provider(
    track: Option<&Path>,
    config: &LandmarkConfig,
) -> PoiseResult<SelectedProvider> {
    if let Some(path) = track {
        let provider = TrackLandmarkProvider::load(path)?;
        let topology = provider.topology()?;
        let track_last_frame = provider.track().last_frame();
        return Ok(SelectedProvider {
            provider: Box::new(provider),
            topology,
            track_last_frame,
        });
    }

    facemark_provider(config)
}

#[cfg(feature = "opencv")]
fn facemark_provider(config: &LandmarkConfig) -> PoiseResult<SelectedProvider> {
    let (cascade, model) = config.opencv_models().ok_or_else(|| {
        PoiseError::config(
            "no landmark source: pass --landmarks or set landmarks.cascade_path and \
             landmarks.facemark_model_path",
        )
    })?;
    let provider = crate::cv::OpenCvFacemarkProvider::new(cascade, model)?;
    Ok(SelectedProvider {
        provider: Box::new(provider),
        topology: FaceTopology::IBUG_68,
        track_last_frame: None,
    })
}

#[cfg(not(feature = "opencv"))]
fn facemark_provider(_config: &LandmarkConfig) -> PoiseResult<SelectedProvider> {
    Err(PoiseError::config(
        "no landmark source: pass --landmarks <TRACK> (live detection needs the opencv feature)",
    ))
}

/// Whether the OpenCV backends were compiled in.
pub fn opencv_available() -> bool {
    cfg!(feature = "opencv")
}

/// Whether `binary` resolves to an executable on `PATH` (or is a valid path).
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .args(["-c", "command -v \"$1\" >/dev/null 2>&1", "sh", binary])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
