//! Types for the upload pipeline.

use std::path::PathBuf;
use tubely_core::models::Video;
use uuid::Uuid;

use crate::Orientation;

/// Immutable settings for [`VideoUploadPipeline`](super::VideoUploadPipeline).
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub max_upload_bytes: u64,
    pub accepted_content_type: String,
    /// Directory for buffered and remuxed files
    pub temp_dir: PathBuf,
    /// Public base the storage key is appended to, e.g. a CDN host
    pub playback_base_url: String,
}

impl PipelineConfig {
    pub fn playback_url(&self, storage_key: &str) -> String {
        format!(
            "{}/{}",
            self.playback_base_url.trim_end_matches('/'),
            storage_key
        )
    }
}

/// One inbound upload.
pub struct UploadRequest<R> {
    pub video_id: Uuid,
    pub uploader_id: Uuid,
    /// Declared media type of the body
    pub content_type: String,
    /// Declared length, when the client sent one
    pub content_length: Option<u64>,
    pub body: R,
}

/// Result of a successful upload.
#[derive(Clone, Debug)]
pub struct UploadOutcome {
    pub storage_key: String,
    pub video_url: String,
    pub orientation: Orientation,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    /// The record as written back to the store
    pub video: Video,
}
