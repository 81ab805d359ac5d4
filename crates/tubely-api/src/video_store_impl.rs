//! Postgres-backed record store for the upload pipeline

use async_trait::async_trait;
use tubely_core::models::Video;
use tubely_db::VideoRepository;
use tubely_processing::VideoRecordStore;
use uuid::Uuid;

/// Adapts [`VideoRepository`] to the pipeline's [`VideoRecordStore`].
#[derive(Clone)]
pub struct PgVideoRecordStore {
    repository: VideoRepository,
}

impl PgVideoRecordStore {
    pub fn new(repository: VideoRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl VideoRecordStore for PgVideoRecordStore {
    async fn get_video(&self, video_id: Uuid) -> anyhow::Result<Option<Video>> {
        Ok(self.repository.get_video(video_id).await?)
    }

    async fn update_video(&self, video: &Video) -> anyhow::Result<Video> {
        Ok(self.repository.update_video(video).await?)
    }
}
