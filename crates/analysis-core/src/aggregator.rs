//! Video aggregation: frames in, report out.

use poise_common::error::{PoiseError, PoiseResult};
use poise_signal_model::frame::Frame;
use poise_signal_model::report::{Report, RunStats};
use poise_signal_model::signal::{AggregateSignal, FrameSignal};

use crate::extractor::SignalExtractor;
use crate::feedback::feedback;
use crate::scorer::score;
use crate::source::{FrameSource, LandmarkProvider};

/// Drives a [`FrameSource`] through landmark detection and signal extraction,
/// then scores the averages.
///
/// Owns its landmark provider for its whole lifetime.
pub struct VideoAggregator {
    provider: Box<dyn LandmarkProvider>,
    extractor: SignalExtractor,
}

impl VideoAggregator {
    pub fn new(provider: Box<dyn LandmarkProvider>, extractor: SignalExtractor) -> Self {
        Self {
            provider,
            extractor,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Signal for a single frame, or `None` when no face was found.
    ///
    /// Only the first detected face is used.
    pub fn analyze_frame(&mut self, frame: Frame) -> PoiseResult<Option<FrameSignal>> {
        let frame = frame.into_order(self.provider.input_order());
        let faces = self.provider.detect(&frame)?;
        if faces.len() > 1 {
            tracing::trace!(
                frame = frame.index,
                faces = faces.len(),
                "Multiple faces, using the first"
            );
        }
        self.extractor.extract_signal(faces.first())
    }

    /// Read the source to the end, collecting one signal per frame with a face.
    ///
    /// Per-frame failures are logged and skipped. A decode error ends the
    /// stream early. The source is released before returning.
    pub fn collect_signals(&mut self, source: &mut dyn FrameSource) -> (Vec<FrameSignal>, RunStats) {
        let mut signals = Vec::new();
        let mut stats = RunStats::default();

        loop {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        frames_read = stats.frames_read,
                        "Frame read failed, ending stream"
                    );
                    break;
                }
            };
            stats.frames_read += 1;
            let index = frame.index;

            match self.analyze_frame(frame) {
                Ok(Some(signal)) => {
                    tracing::trace!(frame = index, eye_contact = signal.eye_contact, "Face analyzed");
                    stats.frames_with_face += 1;
                    signals.push(signal);
                }
                Ok(None) => {
                    tracing::trace!(frame = index, "No face detected");
                }
                Err(e) => {
                    tracing::warn!(frame = index, error = %e, "Skipping frame");
                    stats.frames_failed += 1;
                }
            }
        }

        source.release();
        (signals, stats)
    }

    /// Score a whole video.
    ///
    /// Fails with [`PoiseError::EmptyAggregate`] when no frame had a face.
    pub fn process_video(&mut self, source: &mut dyn FrameSource) -> PoiseResult<Report> {
        tracing::info!(
            source = %source.describe(),
            provider = self.provider.name(),
            topology = self.extractor.topology().name,
            "Processing video"
        );

        let (signals, stats) = self.collect_signals(source);

        let aggregate = AggregateSignal::mean_of(&signals).ok_or(PoiseError::EmptyAggregate {
            frames_read: stats.frames_read,
        })?;

        let report = Report::new(score(&aggregate), feedback(&aggregate), aggregate, stats);

        tracing::info!(
            frames_read = stats.frames_read,
            frames_with_face = stats.frames_with_face,
            frames_failed = stats.frames_failed,
            score = report.score,
            "Video processed"
        );

        Ok(report)
    }
}
