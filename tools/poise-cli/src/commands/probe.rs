//! Show what the configured frame source sees.

use std::path::PathBuf;

use poise_analysis_core::source::FrameSource;
use poise_common::config::AppConfig;
use poise_media::open_source;

pub fn run(config: &AppConfig, video: PathBuf) -> anyhow::Result<()> {
    let mut source = open_source(&video, &config.media)?;

    println!("Source: {}", source.describe());
    println!("  Backend: {}", config.media.backend.as_str());

    let first = source.next_frame();
    source.release();

    match first? {
        Some(frame) => {
            println!("  Frame size: {}x{}", frame.width, frame.height);
            println!("  Channel order: {:?}", frame.order());
        }
        None => println!("  No frames decoded"),
    }

    Ok(())
}
