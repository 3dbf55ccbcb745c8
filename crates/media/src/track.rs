//! Landmark provider that replays a recorded landmark track.

use std::path::Path;

use poise_analysis_core::source::LandmarkProvider;
use poise_common::error::{PoiseError, PoiseResult};
use poise_signal_model::frame::Frame;
use poise_signal_model::landmark::{FaceTopology, LandmarkSet};
use poise_signal_model::track::{parse_track, LandmarkTrack};

/// Looks up each frame's faces in a [`LandmarkTrack`] by frame index.
///
/// Lets any external detector drive scoring: export its landmarks to a track
/// once, then score the video against it.
#[derive(Debug, Clone)]
pub struct TrackLandmarkProvider {
    track: LandmarkTrack,
}

impl TrackLandmarkProvider {
    pub fn new(track: LandmarkTrack) -> Self {
        Self { track }
    }

    /// Read and parse a JSONL track file.
    pub fn load(path: &Path) -> PoiseResult<Self> {
        if !path.exists() {
            return Err(PoiseError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let track = parse_track(&content)
            .map_err(|e| PoiseError::landmarks(format!("{}: {e}", path.display())))?;

        tracing::debug!(
            path = %path.display(),
            records = track.records.len(),
            topology = %track.header.topology,
            "Loaded landmark track"
        );
        Ok(Self { track })
    }

    /// The landmark layout declared by the track header.
    pub fn topology(&self) -> PoiseResult<FaceTopology> {
        self.track
            .topology()
            .map_err(|e| PoiseError::landmarks(e.to_string()))
    }

    pub fn track(&self) -> &LandmarkTrack {
        &self.track
    }
}

impl LandmarkProvider for TrackLandmarkProvider {
    fn detect(&mut self, frame: &Frame) -> PoiseResult<Vec<LandmarkSet>> {
        Ok(self.track.faces_at(frame.index).to_vec())
    }

    fn name(&self) -> &str {
        "track"
    }
}
