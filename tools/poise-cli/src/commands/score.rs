//! Score a video.

use std::path::PathBuf;

use anyhow::Context;
use poise_analysis_core::extractor::SignalExtractor;
use poise_analysis_core::VideoAggregator;
use poise_common::config::AppConfig;
use poise_media::{landmark_provider, open_source};
use poise_signal_model::report::Report;

pub fn run(
    config: &AppConfig,
    video: PathBuf,
    landmarks: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    config.validate()?;

    let selected = landmark_provider(landmarks.as_deref(), &config.landmarks)?;
    let track_last_frame = selected.track_last_frame;

    let mut source = open_source(&video, &config.media)?;
    let mut aggregator =
        VideoAggregator::new(selected.provider, SignalExtractor::new(selected.topology));

    let report = aggregator
        .process_video(&mut *source)
        .with_context(|| format!("Failed to score {}", video.display()))?;

    if let Some(last) = track_last_frame {
        if last >= report.stats.frames_read {
            tracing::warn!(
                track_last_frame = last,
                frames_read = report.stats.frames_read,
                "Landmark track covers frames the video does not have; is it for this video?"
            );
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    Ok(())
}

fn render_report(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("\nOverall Analysis:\n");
    out.push_str(&format!("Score: {}/10\n", report.score));
    out.push_str(&format!("Feedback: {}\n", report.feedback));
    out.push('\n');
    out.push_str(&format!(
        "Frames: {} read, {} with a face ({:.0}%), {} skipped\n",
        report.stats.frames_read,
        report.stats.frames_with_face,
        report.stats.face_ratio() * 100.0,
        report.stats.frames_failed
    ));
    out.push_str(&format!(
        "Averages: confidence {:.2}, nervousness {:.2}, eye contact {:.2}\n",
        report.aggregate.confidence, report.aggregate.nervousness, report.aggregate.eye_contact
    ));
    out
}
