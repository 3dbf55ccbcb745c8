//! Check which backends are usable.

use poise_common::config::{AppConfig, MediaBackend};
use poise_media::{command_exists, opencv_available};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Poise System Check");
    println!("{}", "=".repeat(50));

    let ffmpeg_ok = command_exists(&config.media.ffmpeg_bin);
    let ffprobe_ok = command_exists(&config.media.ffprobe_bin);
    report("ffmpeg", &config.media.ffmpeg_bin, ffmpeg_ok);
    report("ffprobe", &config.media.ffprobe_bin, ffprobe_ok);

    let opencv = opencv_available();
    if opencv {
        println!("[OK] OpenCV backend: compiled in");
    } else {
        println!("[--] OpenCV backend: not compiled in (build with --features opencv)");
    }

    match config.landmarks.opencv_models() {
        Some((cascade, model)) => {
            let found = cascade.exists() && model.exists();
            let tag = if found { "OK" } else { "WARN" };
            println!(
                "[{tag}] Facemark models: {} / {}",
                cascade.display(),
                model.display()
            );
        }
        None => println!("[--] Facemark models: not configured (use --landmarks <TRACK>)"),
    }

    if let Err(e) = config.validate() {
        println!("[WARN] {e}");
    }

    let ready = match config.media.backend {
        MediaBackend::Ffmpeg => ffmpeg_ok && ffprobe_ok,
        MediaBackend::Opencv => opencv,
    };

    println!();
    if ready {
        println!(
            "Frame source '{}' is ready.",
            config.media.backend.as_str()
        );
    } else {
        println!(
            "Frame source '{}' is not usable. See above for fixes.",
            config.media.backend.as_str()
        );
    }

    Ok(())
}

fn report(name: &str, binary: &str, found: bool) {
    if found {
        println!("[OK] {name}: {binary}");
    } else {
        println!("[MISSING] {name}: '{binary}' not found on PATH");
    }
}
