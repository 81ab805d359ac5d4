use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{faststart, probe, MediaError, MediaTools, StreamMetadata};

/// Reject tool paths carrying shell metacharacters or traversal sequences
fn validate_tool_path(path: &str) -> Result<(), MediaError> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() || path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(MediaError::InvalidToolPath(path.to_string()));
    }

    if path.contains("..") {
        return Err(MediaError::InvalidToolPath(path.to_string()));
    }

    Ok(())
}

/// [`MediaTools`] backed by the `ffmpeg` and `ffprobe` binaries.
#[derive(Debug, Clone)]
pub struct FfmpegTools {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegTools {
    pub fn new(
        ffmpeg_path: impl Into<String>,
        ffprobe_path: impl Into<String>,
    ) -> Result<Self, MediaError> {
        let ffmpeg_path = ffmpeg_path.into();
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffmpeg_path)?;
        validate_tool_path(&ffprobe_path)?;

        Ok(Self {
            ffmpeg_path,
            ffprobe_path,
        })
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.ffprobe_path
    }
}

#[async_trait]
impl MediaTools for FfmpegTools {
    async fn remux_faststart(&self, input: &Path) -> Result<PathBuf, MediaError> {
        faststart::remux_faststart(&self.ffmpeg_path, input).await
    }

    async fn probe(&self, path: &Path) -> Result<StreamMetadata, MediaError> {
        probe::probe_streams(&self.ffprobe_path, path).await
    }
}
