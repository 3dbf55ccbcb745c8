//! Final analysis report.

use serde::{Deserialize, Serialize};

use crate::signal::AggregateSignal;

/// Outcome of scoring one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Overall score in `[0.0, 10.0]`.
    pub score: f64,

    /// Space-joined feedback sentences.
    pub feedback: String,

    /// The averages the score and feedback were derived from.
    pub aggregate: AggregateSignal,

    /// Frame counts for the run.
    pub stats: RunStats,

    /// When the analysis finished (RFC 3339).
    pub analyzed_at: String,
}

/// Frame counts gathered while iterating a video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Frames pulled from the source.
    pub frames_read: u64,
    /// Frames that produced a signal.
    pub frames_with_face: u64,
    /// Frames skipped because detection or extraction failed.
    pub frames_failed: u64,
}

impl RunStats {
    /// Fraction of read frames that contributed a signal.
    pub fn face_ratio(&self) -> f64 {
        if self.frames_read == 0 {
            return 0.0;
        }
        self.frames_with_face as f64 / self.frames_read as f64
    }
}

impl Report {
    pub fn new(score: f64, feedback: String, aggregate: AggregateSignal, stats: RunStats) -> Self {
        Self {
            score,
            feedback,
            aggregate,
            stats,
            analyzed_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
