//! Frame source backed by an `ffmpeg` subprocess.
//!
//! `ffprobe` reports the stream dimensions and display rotation, then `ffmpeg`
//! decodes the first video stream to packed `bgr24` on stdout, one
//! `width * height * 3` chunk per frame. ffmpeg autorotates, so a stream tagged
//! for a quarter turn comes out with width and height swapped.

use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use serde::Deserialize;

use poise_analysis_core::source::FrameSource;
use poise_common::config::MediaConfig;
use poise_common::error::{PoiseError, PoiseResult};
use poise_signal_model::frame::{ChannelOrder, Frame};

/// Decodes a video file through `ffmpeg`.
pub struct FfmpegFrameSource {
    path: PathBuf,
    width: u32,
    height: u32,
    child: Option<Child>,
    stdout: Option<BufReader<ChildStdout>>,
    stderr_task: Option<JoinHandle<String>>,
    next_index: u64,
}

impl FfmpegFrameSource {
    /// Probe and start decoding `path`.
    ///
    /// Fails with [`PoiseError::SourceOpen`] when the file is missing, has no
    /// decodable video stream, or ffmpeg cannot be started.
    pub fn open(path: &Path, config: &MediaConfig) -> PoiseResult<Self> {
        if !path.exists() {
            return Err(PoiseError::source_open(path, "file does not exist"));
        }

        let stream = probe_video_stream(&config.ffprobe_bin, path)?;
        let (width, height) = stream.output_dimensions();

        tracing::debug!(
            path = %path.display(),
            width,
            height,
            rotation = stream.rotation,
            "Starting ffmpeg decoder"
        );

        let mut child = Command::new(&config.ffmpeg_bin)
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "bgr24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                PoiseError::source_open(
                    path,
                    format!("failed to start {}: {e}", config.ffmpeg_bin),
                )
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PoiseError::source_open(path, "failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| PoiseError::source_open(path, "failed to capture ffmpeg stderr"))?;

        // Drain stderr concurrently to avoid ffmpeg blocking on a full stderr pipe.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        Ok(Self {
            path: path.to_path_buf(),
            width,
            height,
            child: Some(child),
            stdout: Some(BufReader::new(stdout)),
            stderr_task: Some(stderr_task),
            next_index: 0,
        })
    }
}

impl FrameSource for FfmpegFrameSource {
    fn next_frame(&mut self) -> PoiseResult<Option<Frame>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut buf = vec![0u8; Frame::byte_len(self.width, self.height)];
        let filled = read_full(stdout, &mut buf)
            .map_err(|e| PoiseError::decode(format!("failed reading ffmpeg output: {e}")))?;

        if filled == 0 {
            return Ok(None);
        }
        if filled < buf.len() {
            tracing::warn!(
                frame = self.next_index,
                bytes = filled,
                expected = buf.len(),
                "Truncated trailing frame, ending stream"
            );
            return Ok(None);
        }

        let frame = Frame::new(
            self.next_index,
            self.width,
            self.height,
            ChannelOrder::Bgr,
            buf,
        )
        .map_err(|e| PoiseError::decode(e.to_string()))?;
        self.next_index += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        // Closing the pipe first lets a still-running ffmpeg exit on EPIPE.
        self.stdout = None;

        let Some(mut child) = self.child.take() else {
            return;
        };

        let status = match child.try_wait() {
            Ok(Some(status)) => Ok(status),
            Ok(None) => {
                let _ = child.kill();
                child.wait()
            }
            Err(e) => Err(e),
        };

        let stderr_output = self
            .stderr_task
            .take()
            .and_then(|task| task.join().ok())
            .unwrap_or_default();

        match status {
            Ok(status) if status.success() => {
                tracing::debug!(frames = self.next_index, "ffmpeg decoder finished");
            }
            Ok(status) => {
                tracing::warn!(
                    path = %self.path.display(),
                    status = %status,
                    stderr = stderr_output.trim(),
                    "ffmpeg exited with failure"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to wait on ffmpeg");
            }
        }
    }

    fn describe(&self) -> String {
        format!(
            "ffmpeg:{} ({}x{})",
            self.path.display(),
            self.width,
            self.height
        )
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Fill `buf` from `reader`, stopping early only at end of stream.
/// Returns the number of bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Geometry of the first video stream as reported by `ffprobe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbedStream {
    /// Coded width, before rotation.
    pub width: u32,
    /// Coded height, before rotation.
    pub height: u32,
    /// Display rotation in degrees, normalized to `0..360`.
    pub rotation: u32,
}

impl ProbedStream {
    /// Size of the frames ffmpeg emits once autorotation is applied.
    pub fn output_dimensions(&self) -> (u32, u32) {
        match self.rotation {
            90 | 270 => (self.height, self.width),
            _ => (self.width, self.height),
        }
    }
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStreamEntry>,
}

#[derive(Deserialize)]
struct ProbeStreamEntry {
    width: Option<u32>,
    height: Option<u32>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    #[serde(default)]
    tags: ProbeTags,
}

#[derive(Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

#[derive(Default, Deserialize)]
struct ProbeTags {
    rotate: Option<String>,
}

/// Probe the first video stream of `path`.
pub fn probe_video_stream(ffprobe_bin: &str, path: &Path) -> PoiseResult<ProbedStream> {
    let output = Command::new(ffprobe_bin)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_streams",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| PoiseError::source_open(path, format!("failed to run {ffprobe_bin}: {e}")))?;

    if !output.status.success() {
        return Err(PoiseError::source_open(
            path,
            format!(
                "unsupported or unreadable video: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
        .ok_or_else(|| PoiseError::source_open(path, "no video stream found"))
}

/// Parse `ffprobe -show_streams -of json` output.
///
/// Rotation comes from the display matrix side data, falling back to the
/// legacy `rotate` tag.
fn parse_probe_output(raw: &str) -> Option<ProbedStream> {
    let probe: ProbeOutput = serde_json::from_str(raw).ok()?;
    let stream = probe.streams.into_iter().next()?;
    let width = stream.width.filter(|&w| w > 0)?;
    let height = stream.height.filter(|&h| h > 0)?;

    let degrees = stream
        .side_data_list
        .iter()
        .find_map(|side| side.rotation)
        .or_else(|| stream.tags.rotate.as_deref()?.trim().parse::<f64>().ok())
        .unwrap_or(0.0);
    let rotation = (degrees.round() as i64).rem_euclid(360) as u32;

    Some(ProbedStream {
        width,
        height,
        rotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most `chunk` bytes per read.
    struct Trickle<R> {
        inner: R,
        chunk: usize,
    }

    impl<R: Read> Read for Trickle<R> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.chunk);
            self.inner.read(&mut buf[..n])
        }
    }

    #[test]
    fn test_parse_probe_without_rotation() {
        let raw = r#"{"streams":[{"index":0,"codec_type":"video","width":1920,"height":1080}]}"#;
        let stream = parse_probe_output(raw).unwrap();
        assert_eq!(stream.rotation, 0);
        assert_eq!(stream.output_dimensions(), (1920, 1080));
    }

    #[test]
    fn test_parse_probe_display_matrix_rotation_swaps_output() {
        let raw = r#"{
            "streams": [{
                "width": 1920,
                "height": 1080,
                "side_data_list": [
                    {"side_data_type": "Display Matrix", "displaymatrix": "...", "rotation": -90}
                ]
            }]
        }"#;
        let stream = parse_probe_output(raw).unwrap();
        assert_eq!((stream.width, stream.height), (1920, 1080));
        assert_eq!(stream.rotation, 270);
        assert_eq!(stream.output_dimensions(), (1080, 1920));
    }

    #[test]
    fn test_parse_probe_rotate_tag_fallback() {
        let raw = r#"{"streams":[{"width":640,"height":480,"tags":{"rotate":"90"}}]}"#;
        assert_eq!(parse_probe_output(raw).unwrap().output_dimensions(), (480, 640));

        let upside_down = r#"{"streams":[{"width":640,"height":480,"tags":{"rotate":"180"}}]}"#;
        assert_eq!(
            parse_probe_output(upside_down).unwrap().output_dimensions(),
            (640, 480)
        );
    }

    #[test]
    fn test_parse_probe_rejects_missing_stream() {
        assert_eq!(parse_probe_output(r#"{"streams":[]}"#), None);
        assert_eq!(parse_probe_output(r#"{}"#), None);
        assert_eq!(
            parse_probe_output(r#"{"streams":[{"width":0,"height":480}]}"#),
            None
        );
        assert_eq!(parse_probe_output("N/A"), None);
    }

    #[test]
    fn test_read_full_across_short_reads() {
        let mut reader = Trickle {
            inner: Cursor::new((0u8..12).collect::<Vec<_>>()),
            chunk: 5,
        };
        let mut buf = [0u8; 12];
        assert_eq!(read_full(&mut reader, &mut buf).unwrap(), 12);
        assert_eq!(buf[11], 11);
    }

    #[test]
    fn test_read_full_reports_truncation() {
        let mut reader = Cursor::new(vec![1u8; 7]);
        let mut buf = [0u8; 12];
        assert_eq!(read_full(&mut reader, &mut buf).unwrap(), 7);
        assert_eq!(read_full(&mut reader, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_open_missing_file_is_source_open_error() {
        let path = std::env::temp_dir().join("poise-definitely-missing-video.mp4");
        match FfmpegFrameSource::open(&path, &MediaConfig::default()) {
            Err(PoiseError::SourceOpen { path: p, message }) => {
                assert_eq!(p, path);
                assert!(message.contains("does not exist"));
            }
            Err(other) => panic!("expected SourceOpen, got {other:?}"),
            Ok(_) => panic!("expected SourceOpen, got a source"),
        }
    }

    #[test]
    fn test_open_with_missing_probe_binary_is_source_open_error() {
        let path = std::env::temp_dir().join(format!("poise-probe-{}.mp4", std::process::id()));
        std::fs::write(&path, b"not a video").unwrap();
        let config = MediaConfig {
            ffprobe_bin: "poise-no-such-ffprobe-binary".to_string(),
            ..MediaConfig::default()
        };
        let result = FfmpegFrameSource::open(&path, &config);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(PoiseError::SourceOpen { .. })));
    }
}
