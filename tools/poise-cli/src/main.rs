//! Poise CLI: score interview videos from facial landmarks.
//!
//! Usage:
//!   poise score <VIDEO>          Score a video and print feedback
//!   poise probe <VIDEO>          Show what the frame source sees
//!   poise track-info <TRACK>     Summarize a landmark track
//!   poise check                  Check available backends

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use poise_common::config::{AppConfig, MediaBackend};
use poise_common::error::PoiseError;

mod commands;

#[derive(Parser)]
#[command(
    name = "poise",
    about = "Heuristic interview video scoring from facial landmarks",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a video and print overall feedback
    Score {
        /// Path to the video file
        video: PathBuf,

        /// Recorded landmark track (JSONL) to replay instead of live detection
        #[arg(short, long)]
        landmarks: Option<PathBuf>,

        /// Frame source backend: ffmpeg|opencv
        #[arg(long)]
        backend: Option<MediaBackend>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open a video and report its frame geometry
    Probe {
        /// Path to the video file
        video: PathBuf,

        /// Frame source backend: ffmpeg|opencv
        #[arg(long)]
        backend: Option<MediaBackend>,
    },

    /// Summarize a recorded landmark track
    TrackInfo {
        /// Path to the track file
        path: PathBuf,
    },

    /// Check which decoding and detection backends are usable
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    poise_common::logging::init_logging(&config.logging);

    let result = match cli.command {
        Commands::Score {
            video,
            landmarks,
            backend,
            json,
        } => {
            if let Some(backend) = backend {
                config.media.backend = backend;
            }
            commands::score::run(&config, video, landmarks, json)
        }
        Commands::Probe { video, backend } => {
            if let Some(backend) = backend {
                config.media.backend = backend;
            }
            commands::probe::run(&config, video)
        }
        Commands::TrackInfo { path } => commands::track_info::run(path),
        Commands::Check => commands::check::run(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// 2 when the video could not be opened, 3 when no face was found, else 1.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    let Some(fatal) = err
        .downcast_ref::<PoiseError>()
        .filter(|e| e.is_run_fatal())
    else {
        return 1;
    };
    match fatal {
        PoiseError::SourceOpen { .. } => 2,
        _ => 3,
    }
}
