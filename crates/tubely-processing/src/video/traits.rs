use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{MediaError, StreamMetadata};

/// The two external media operations the upload pipeline depends on.
///
/// [`FfmpegTools`](super::FfmpegTools) runs the real binaries; tests substitute
/// fakes returning canned results or injected failures.
#[async_trait]
pub trait MediaTools: Send + Sync {
    /// Rewrite `input` with its index moved to the front, without re-encoding.
    ///
    /// Returns the path of a new sibling file. The caller owns that file from
    /// then on. On failure no output file is left behind.
    async fn remux_faststart(&self, input: &Path) -> Result<PathBuf, MediaError>;

    /// Dimensions of the first video stream in `path`.
    async fn probe(&self, path: &Path) -> Result<StreamMetadata, MediaError>;
}
