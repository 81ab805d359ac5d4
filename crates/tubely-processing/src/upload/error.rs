use tubely_storage::StorageError;
use uuid::Uuid;

use crate::validator::ValidationError;
use crate::video::MediaError;

/// Why an upload failed. Every variant aborts the whole request.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to read upload body: {0}")]
    BodyRead(#[source] std::io::Error),

    #[error("Video processing failed: {0}")]
    Processing(#[from] MediaError),

    #[error("Temporary file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage upload failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to update video record {video_id}: {source}")]
    Record {
        video_id: Uuid,
        #[source]
        source: anyhow::Error,
    },
}

/// Coarse classification of [`UploadError`] for callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadErrorKind {
    /// Caller's fault; nothing was stored
    Validation,
    Processing,
    Storage,
    Record,
    Internal,
}

impl UploadError {
    pub fn kind(&self) -> UploadErrorKind {
        match self {
            UploadError::Validation(_) | UploadError::BodyRead(_) => UploadErrorKind::Validation,
            UploadError::Processing(_) => UploadErrorKind::Processing,
            UploadError::Io(_) => UploadErrorKind::Internal,
            UploadError::Storage(_) => UploadErrorKind::Storage,
            UploadError::Record { .. } => UploadErrorKind::Record,
        }
    }
}
