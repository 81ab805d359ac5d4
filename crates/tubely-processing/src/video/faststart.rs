//! Fast-start remux: relocate the MP4 index (`moov`) ahead of the media data
//! with a stream copy, so playback can begin before the download finishes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::MediaError;
use crate::upload::TempArtifact;

const OUTPUT_SUFFIX: &str = ".processing";

/// Sibling output path for a remux of `input`: `<input>.processing`.
pub fn output_path_for(input: &Path) -> PathBuf {
    let mut name: OsString = input.as_os_str().to_owned();
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

/// Run `ffmpeg -c copy -movflags faststart` from `input` into its sibling
/// output path.
///
/// Any partially written output is removed before an error is returned.
#[tracing::instrument(skip(ffmpeg_path), fields(
    process.executable.name = "ffmpeg",
    process.executable.path = %ffmpeg_path,
    ffmpeg.operation = "faststart"
))]
pub async fn remux_faststart(ffmpeg_path: &str, input: &Path) -> Result<PathBuf, MediaError> {
    let start = std::time::Instant::now();
    let output_path = output_path_for(input);

    // Owns the output until ffmpeg has succeeded and the file is confirmed.
    let output_guard = TempArtifact::adopt(output_path.clone());

    let output = Command::new(ffmpeg_path)
        .args(["-y", "-v", "error", "-i"])
        .arg(input)
        .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
        .arg(&output_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| MediaError::Spawn {
            tool: "ffmpeg",
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::warn!(
            status = %output.status,
            stderr = %stderr,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fast-start remux failed"
        );
        return Err(MediaError::CommandFailed {
            tool: "ffmpeg",
            status: output.status.to_string(),
            stderr,
        });
    }

    if !tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
        return Err(MediaError::MissingOutput(output_path));
    }

    tracing::info!(
        output = %output_path.display(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Fast-start remux completed"
    );

    Ok(output_guard.keep())
}
