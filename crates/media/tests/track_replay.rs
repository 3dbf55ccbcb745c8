use std::path::PathBuf;

use poise_analysis_core::extractor::SignalExtractor;
use poise_analysis_core::source::{FrameSource, LandmarkProvider};
use poise_analysis_core::VideoAggregator;
use poise_common::config::{LandmarkConfig, MediaConfig};
use poise_common::error::{PoiseError, PoiseResult};
use poise_media::{landmark_provider, open_source, TrackLandmarkProvider};
use poise_signal_model::frame::{ChannelOrder, Frame};
use poise_signal_model::landmark::FaceTopology;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

/// Emits `count` black frames, standing in for a decoded video.
struct BlankVideo {
    next: u64,
    count: u64,
}

impl FrameSource for BlankVideo {
    fn next_frame(&mut self) -> PoiseResult<Option<Frame>> {
        if self.next >= self.count {
            return Ok(None);
        }
        let frame = Frame::new(self.next, 4, 3, ChannelOrder::Bgr, vec![0; 4 * 3 * 3])
            .map_err(|e| PoiseError::decode(e.to_string()))?;
        self.next += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {}

    fn describe(&self) -> String {
        format!("blank x{}", self.count)
    }
}

#[test]
fn sample_track_scores_end_to_end() {
    let selected =
        landmark_provider(Some(&fixture("sample-track.jsonl")), &LandmarkConfig::default())
            .unwrap();
    assert_eq!(selected.topology, FaceTopology::IBUG_68);
    assert_eq!(selected.track_last_frame, Some(9));
    assert_eq!(selected.provider.name(), "track");

    let mut aggregator =
        VideoAggregator::new(selected.provider, SignalExtractor::new(selected.topology));
    let mut video = BlankVideo { next: 0, count: 10 };

    let report = aggregator.process_video(&mut video).unwrap();

    // Frames 3 (empty) and 7 (absent) carry no face; 5 of the other 8 look ahead.
    assert_eq!(report.stats.frames_read, 10);
    assert_eq!(report.stats.frames_with_face, 8);
    assert_eq!(report.stats.frames_failed, 0);
    assert!((report.aggregate.eye_contact - 0.625).abs() < 1e-12);
    assert!((report.score - 9.725).abs() < 1e-9);
    assert_eq!(
        report.feedback,
        "You appear confident. You seem calm and composed. You maintained good eye contact."
    );
}

#[test]
fn frames_past_the_track_have_no_face() {
    let provider = TrackLandmarkProvider::load(&fixture("sample-track.jsonl")).unwrap();
    assert_eq!(provider.track().last_frame(), Some(9));
    assert_eq!(provider.track().header.width, Some(640));

    let mut aggregator = VideoAggregator::new(Box::new(provider), SignalExtractor::default());
    let mut video = BlankVideo { next: 0, count: 40 };

    let report = aggregator.process_video(&mut video).unwrap();

    assert_eq!(report.stats.frames_read, 40);
    assert_eq!(report.stats.frames_with_face, 8);
    assert!((report.stats.face_ratio() - 0.2).abs() < 1e-12);
}

#[test]
fn missing_video_is_a_source_open_error() {
    let path = std::env::temp_dir().join("poise-media-no-such-video.mp4");
    match open_source(&path, &MediaConfig::default()) {
        Err(PoiseError::SourceOpen { path: p, .. }) => assert_eq!(p, path),
        Err(other) => panic!("expected SourceOpen, got {other:?}"),
        Ok(source) => panic!("expected SourceOpen, opened {}", source.describe()),
    }
}
