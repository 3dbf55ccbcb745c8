//! Recorded landmark tracks.
//!
//! A track stores the output of an external landmark detector for a video,
//! one JSONL record per frame that had at least one face. The first line may be
//! a `# {...}` header comment describing the track. Frames with no record had
//! no face.
//!
//! ```text
//! # {"schema_version":"1.0","topology":"ibug68"}
//! {"frame":0,"faces":[[{"x":0.41,"y":0.38}, ...]]}
//! {"frame":2,"faces":[[{"x":0.42,"y":0.38}, ...]]}
//! ```

use serde::{Deserialize, Serialize};

use crate::landmark::{FaceTopology, LandmarkSet};

/// Zero-based frame index within a video.
pub type FrameIndex = u64;

/// Errors while reading a landmark track.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: frame {frame} is not after frame {previous}")]
    OutOfOrder {
        line: usize,
        frame: FrameIndex,
        previous: FrameIndex,
    },

    #[error("unknown landmark topology '{0}'")]
    UnknownTopology(String),
}

/// Metadata carried in the track's header comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackHeader {
    /// Schema version for forward compatibility.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Landmark layout name, see [`FaceTopology::by_name`].
    #[serde(default = "default_topology")]
    pub topology: String,

    /// Detector that produced the track.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detector: Option<String>,

    /// Frame dimensions the landmarks were normalized against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

fn default_topology() -> String {
    FaceTopology::IBUG_68.name.to_string()
}

impl Default for TrackHeader {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            topology: default_topology(),
            detector: None,
            width: None,
            height: None,
        }
    }
}

/// Detected faces for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub frame: FrameIndex,
    pub faces: Vec<LandmarkSet>,
}

/// A parsed landmark track, records sorted by strictly increasing frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkTrack {
    pub header: TrackHeader,
    pub records: Vec<TrackRecord>,
}

impl LandmarkTrack {
    /// The layout named in the header.
    pub fn topology(&self) -> Result<FaceTopology, TrackError> {
        FaceTopology::by_name(&self.header.topology)
            .ok_or_else(|| TrackError::UnknownTopology(self.header.topology.clone()))
    }

    /// Faces recorded for `frame`; empty if the frame had none.
    pub fn faces_at(&self, frame: FrameIndex) -> &[LandmarkSet] {
        match self.records.binary_search_by_key(&frame, |r| r.frame) {
            Ok(i) => &self.records[i].faces,
            Err(_) => &[],
        }
    }

    /// Highest frame index with a record.
    pub fn last_frame(&self) -> Option<FrameIndex> {
        self.records.last().map(|r| r.frame)
    }
}

/// Parse a landmark track from JSONL.
pub fn parse_track(jsonl: &str) -> Result<LandmarkTrack, TrackError> {
    let mut track = LandmarkTrack::default();
    let mut seen_record = false;

    for (i, raw) in jsonl.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            // Only a leading comment is a header; later comments are ignored.
            if !seen_record {
                let comment = comment.trim();
                if comment.starts_with('{') {
                    track.header = serde_json::from_str(comment).map_err(|source| {
                        TrackError::Json {
                            line: line_no,
                            source,
                        }
                    })?;
                }
            }
            continue;
        }

        let record: TrackRecord = serde_json::from_str(line).map_err(|source| TrackError::Json {
            line: line_no,
            source,
        })?;
        if let Some(prev) = track.records.last() {
            if record.frame <= prev.frame {
                return Err(TrackError::OutOfOrder {
                    line: line_no,
                    frame: record.frame,
                    previous: prev.frame,
                });
            }
        }
        seen_record = true;
        track.records.push(record);
    }

    Ok(track)
}

/// Serialize a track to JSONL with its header comment.
pub fn serialize_track(track: &LandmarkTrack) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    output.push_str("# ");
    output.push_str(&serde_json::to_string(&track.header)?);
    output.push('\n');
    for record in &track.records {
        output.push_str(&serde_json::to_string(record)?);
        output.push('\n');
    }
    Ok(output)
}
