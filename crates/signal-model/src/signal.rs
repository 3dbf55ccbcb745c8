//! Per-frame signals and their whole-video averages.

use serde::{Deserialize, Serialize};

/// The three heuristic measurements taken from one frame with a face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSignal {
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Nervousness in `[0.0, 1.0]`.
    pub nervousness: f64,
    /// 1 if the eye-contact heuristic fired for this frame, else 0.
    pub eye_contact: u8,
}

impl FrameSignal {
    pub fn new(confidence: f64, nervousness: f64, eye_contact: bool) -> Self {
        Self {
            confidence,
            nervousness,
            eye_contact: u8::from(eye_contact),
        }
    }

    pub fn has_eye_contact(&self) -> bool {
        self.eye_contact != 0
    }
}

/// Arithmetic means of every [`FrameSignal`] field over a video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateSignal {
    pub confidence: f64,
    pub nervousness: f64,
    /// Fraction of analyzed frames with eye contact, `[0.0, 1.0]`.
    pub eye_contact: f64,
}

impl AggregateSignal {
    pub fn new(confidence: f64, nervousness: f64, eye_contact: f64) -> Self {
        Self {
            confidence,
            nervousness,
            eye_contact,
        }
    }

    /// Mean of each field. `None` for an empty slice: a mean over zero
    /// frames has no value and callers must not invent one.
    pub fn mean_of(signals: &[FrameSignal]) -> Option<Self> {
        if signals.is_empty() {
            return None;
        }
        let n = signals.len() as f64;
        let (c, nv, e) = signals.iter().fold((0.0, 0.0, 0.0), |(c, nv, e), s| {
            (
                c + s.confidence,
                nv + s.nervousness,
                e + f64::from(s.eye_contact),
            )
        });
        Some(Self {
            confidence: c / n,
            nervousness: nv / n,
            eye_contact: e / n,
        })
    }
}
