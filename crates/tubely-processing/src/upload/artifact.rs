//! Scoped ownership of temporary files.

use std::io;
use std::path::{Path, PathBuf};

const TEMP_PREFIX: &str = "tubely-upload-";
const TEMP_SUFFIX: &str = ".mp4";

/// A temporary file owned by one upload.
///
/// The file is deleted by [`release`](Self::release) or, if that never happens
/// (early return, panic, cancelled future), synchronously on drop. A file that
/// is already gone is not an error.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    armed: bool,
}

impl TempArtifact {
    /// Create a uniquely named empty file in `dir`, returned open for writing.
    pub fn create_in(dir: &Path) -> io::Result<(Self, tokio::fs::File)> {
        let named = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)?;
        let (file, path) = named.keep().map_err(|e| e.error)?;

        Ok((Self::adopt(path), tokio::fs::File::from_std(file)))
    }

    /// Take ownership of an existing (or about to exist) file.
    pub fn adopt(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now.
    pub async fn release(mut self) -> io::Result<()> {
        self.armed = false;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Give up ownership without deleting; the caller becomes responsible.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Failed to remove temporary file"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_release_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let (artifact, mut file) = TempArtifact::create_in(dir.path()).unwrap();
        file.write_all(b"data").await.unwrap();
        drop(file);

        let path = artifact.path().to_path_buf();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("tubely-upload-"));
        assert!(name.ends_with(".mp4"));

        artifact.release().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let (artifact, file) = TempArtifact::create_in(dir.path()).unwrap();
        drop(file);
        let path = artifact.path().to_path_buf();

        drop(artifact);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = TempArtifact::adopt(dir.path().join("never-created.mp4"));
        artifact.release().await.unwrap();

        // Drop path as well
        let _ = TempArtifact::adopt(dir.path().join("also-missing.mp4"));
    }

    #[tokio::test]
    async fn test_keep_disarms() {
        let dir = tempfile::tempdir().unwrap();
        let (artifact, file) = TempArtifact::create_in(dir.path()).unwrap();
        drop(file);

        let path = artifact.keep();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let (a, _fa) = TempArtifact::create_in(dir.path()).unwrap();
        let (b, _fb) = TempArtifact::create_in(dir.path()).unwrap();
        assert_ne!(a.path(), b.path());
    }
}
