//! Poise Media
//!
//! Concrete collaborators for the analysis pipeline:
//!
//! ```text
//! video.mp4 ──► FrameSource (ffmpeg | opencv) ──► BGR frames
//!                                                    │
//!                                                    ▼
//!                 LandmarkProvider (track | opencv facemark)
//!                                                    │
//!                                                    ▼
//!                                          VideoAggregator
//! ```
//!
//! The `opencv` feature adds `VideoCapture` decoding and LBF facemark
//! detection. Without it, frames come from an `ffmpeg` subprocess and
//! landmarks from a recorded track file.

pub mod backend;
pub mod ffmpeg;
#[cfg(feature = "opencv")]
pub mod cv;
pub mod track;

pub use backend::*;
pub use ffmpeg::FfmpegFrameSource;
pub use track::TrackLandmarkProvider;
