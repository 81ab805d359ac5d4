//! Collaborator interfaces for the upload pipeline.

use async_trait::async_trait;
use tubely_core::models::Video;
use uuid::Uuid;

/// Persistence of video records.
///
/// The API implements this over its Postgres repository.
#[async_trait]
pub trait VideoRecordStore: Send + Sync {
    /// Fetch a record by id.
    async fn get_video(&self, video_id: Uuid) -> anyhow::Result<Option<Video>>;

    /// Overwrite a record with `video` and return it as persisted.
    async fn update_video(&self, video: &Video) -> anyhow::Result<Video>;
}
