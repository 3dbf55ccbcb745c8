//! Collaborator interfaces for decoding and landmark detection.

use poise_common::error::PoiseResult;
use poise_signal_model::frame::{ChannelOrder, Frame};
use poise_signal_model::landmark::LandmarkSet;

/// A finite, forward-only sequence of decoded frames.
pub trait FrameSource {
    /// Read the next frame. `Ok(None)` marks end of stream.
    fn next_frame(&mut self) -> PoiseResult<Option<Frame>>;

    /// Release decoder resources. Safe to call more than once.
    fn release(&mut self);

    /// Human-readable description for logs (path, backend).
    fn describe(&self) -> String;
}

/// A facial landmark detector.
///
/// May keep model state between calls; it is only ever driven from one thread.
pub trait LandmarkProvider {
    /// Channel order `detect` expects. Frames are converted before the call.
    fn input_order(&self) -> ChannelOrder {
        ChannelOrder::Rgb
    }

    /// Detect faces in one frame, returning normalized landmarks for each.
    /// An empty list means no face.
    fn detect(&mut self, frame: &Frame) -> PoiseResult<Vec<LandmarkSet>>;

    /// Backend name.
    fn name(&self) -> &str;
}
