//! Stream probing through `ffprobe`.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::MediaError;

/// Pixel dimensions of a probed video stream. Both are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamMetadata {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

/// Extract the dimensions of the first video stream from
/// `ffprobe -print_format json -show_streams` output.
///
/// Streams typed as anything other than `video` are skipped even when they
/// report dimensions (bitmap subtitles do). Untyped streams with a width and
/// height are accepted.
pub fn parse_probe_output(stdout: &[u8]) -> Result<StreamMetadata, MediaError> {
    let output: ProbeOutput =
        serde_json::from_slice(stdout).map_err(MediaError::MalformedProbeOutput)?;

    output
        .streams
        .iter()
        .filter(|stream| matches!(stream.codec_type.as_deref(), None | Some("video")))
        .find_map(|stream| match (stream.width, stream.height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => {
                tracing::trace!(
                    codec_type = stream.codec_type.as_deref().unwrap_or("unknown"),
                    width,
                    height,
                    "Selected stream"
                );
                Some(StreamMetadata { width, height })
            }
            _ => None,
        })
        .ok_or(MediaError::NoVideoStream)
}

/// Run ffprobe against `path` and parse its stream list.
#[tracing::instrument(skip(ffprobe_path), fields(
    process.executable.name = "ffprobe",
    process.executable.path = %ffprobe_path,
    ffmpeg.operation = "probe"
))]
pub async fn probe_streams(ffprobe_path: &str, path: &Path) -> Result<StreamMetadata, MediaError> {
    let start = std::time::Instant::now();

    let output = Command::new(ffprobe_path)
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(path)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| MediaError::Spawn {
            tool: "ffprobe",
            source,
        })?;

    if !output.status.success() {
        return Err(MediaError::CommandFailed {
            tool: "ffprobe",
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let metadata = parse_probe_output(&output.stdout)?;

    tracing::info!(
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        width = metadata.width,
        height = metadata.height,
        "Video probe completed"
    );

    Ok(metadata)
}
