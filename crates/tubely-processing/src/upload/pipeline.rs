//! The video upload pipeline.
//!
//! Each request is buffered to disk (the remux needs random access), remuxed
//! for fast start, probed, classified, uploaded under a fresh key and finally
//! published by writing the playback URL to the video record. Stages run
//! strictly in order and nothing is retried. Every temporary file is owned by
//! a [`TempArtifact`] so it is removed on every exit path.

use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufWriter};
use tubely_storage::{Storage, StorageKey};

use super::artifact::TempArtifact;
use super::error::UploadError;
use super::traits::VideoRecordStore;
use super::types::{PipelineConfig, UploadOutcome, UploadRequest};
use crate::ratio::aspect_ratio;
use crate::validator::MediaValidator;
use crate::video::{MediaError, MediaTools};
use crate::Orientation;
use tubely_core::constants::VIDEO_KEY_EXTENSION;

const READ_CHUNK_SIZE: usize = 64 * 1024;

pub struct VideoUploadPipeline {
    config: PipelineConfig,
    validator: MediaValidator,
    tools: Arc<dyn MediaTools>,
    storage: Arc<dyn Storage>,
    records: Arc<dyn VideoRecordStore>,
}

impl VideoUploadPipeline {
    pub fn new(
        config: PipelineConfig,
        tools: Arc<dyn MediaTools>,
        storage: Arc<dyn Storage>,
        records: Arc<dyn VideoRecordStore>,
    ) -> Self {
        let validator =
            MediaValidator::new(config.max_upload_bytes, config.accepted_content_type.clone());
        Self {
            config,
            validator,
            tools,
            storage,
            records,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one upload to completion.
    #[tracing::instrument(skip(self, request), fields(
        video_id = %request.video_id,
        uploader_id = %request.uploader_id,
    ))]
    pub async fn run<R>(&self, request: UploadRequest<R>) -> Result<UploadOutcome, UploadError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let start = Instant::now();
        let UploadRequest {
            video_id,
            content_type,
            content_length,
            mut body,
            ..
        } = request;

        self.validator.validate_declared_size(content_length)?;
        let content_type = self.validator.validate_content_type(&content_type)?;

        let (buffered, received) = self.buffer_body(&mut body).await?;
        tracing::debug!(
            path = %buffered.path().display(),
            size_bytes = received,
            "Upload buffered"
        );

        let remuxed = TempArtifact::adopt(self.tools.remux_faststart(buffered.path()).await?);
        if !tokio::fs::try_exists(remuxed.path()).await.unwrap_or(false) {
            return Err(MediaError::MissingOutput(remuxed.path().to_path_buf()).into());
        }
        release_quietly(buffered).await;

        let metadata = self.tools.probe(remuxed.path()).await?;
        let orientation = Orientation::classify(metadata.width, metadata.height);
        let ratio = aspect_ratio(metadata.width, metadata.height);
        tracing::debug!(
            width = metadata.width,
            height = metadata.height,
            aspect_ratio = ratio.as_deref().unwrap_or("unknown"),
            orientation = %orientation,
            "Video classified"
        );

        let key = StorageKey::generate(orientation.as_str(), VIDEO_KEY_EXTENSION);

        let file = tokio::fs::File::open(remuxed.path()).await?;
        let size_bytes = file.metadata().await?.len();
        self.storage
            .upload_stream(key.as_str(), &content_type, Some(size_bytes), Box::pin(file))
            .await?;

        let video_url = self.config.playback_url(key.as_str());
        let video = self.publish(video_id, key.as_str(), &video_url).await?;

        release_quietly(remuxed).await;

        tracing::info!(
            storage_key = %key,
            video_url = %video_url,
            orientation = %orientation,
            size_bytes = size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video upload completed"
        );

        Ok(UploadOutcome {
            storage_key: key.into_string(),
            video_url,
            orientation,
            width: metadata.width,
            height: metadata.height,
            size_bytes,
            video,
        })
    }

    /// Copy the body into a fresh temporary file, enforcing the size limit as
    /// bytes arrive.
    async fn buffer_body<R>(&self, body: &mut R) -> Result<(TempArtifact, u64), UploadError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let (artifact, file) = TempArtifact::create_in(&self.config.temp_dir)?;
        let mut writer = BufWriter::new(file);
        let mut buf = vec![0u8; READ_CHUNK_SIZE];
        let mut received: u64 = 0;

        loop {
            let n = body.read(&mut buf).await.map_err(UploadError::BodyRead)?;
            if n == 0 {
                break;
            }

            received += n as u64;
            if received > self.validator.max_file_size() {
                // Report the running count; the rest of the body is never read.
                self.validator.validate_file_size(received)?;
            }

            writer.write_all(&buf[..n]).await?;
        }

        self.validator.validate_file_size(received)?;

        writer.flush().await?;
        writer.into_inner().sync_all().await?;

        Ok((artifact, received))
    }

    /// Write the playback URL back to the record.
    ///
    /// The object is already stored at this point; a failure here leaves it
    /// orphaned.
    async fn publish(
        &self,
        video_id: uuid::Uuid,
        storage_key: &str,
        video_url: &str,
    ) -> Result<tubely_core::models::Video, UploadError> {
        let result = async {
            let record = self
                .records
                .get_video(video_id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("video record not found"))?;
            let stored = self
                .records
                .update_video(&record.with_video_url(video_url))
                .await?;
            Ok::<_, anyhow::Error>(stored)
        }
        .await;

        result.map_err(|source| {
            tracing::warn!(
                error = %source,
                storage_key = %storage_key,
                "Video record update failed; stored object is orphaned"
            );
            UploadError::Record { video_id, source }
        })
    }
}

async fn release_quietly(artifact: TempArtifact) {
    let path = artifact.path().to_path_buf();
    if let Err(e) = artifact.release().await {
        tracing::warn!(
            error = %e,
            path = %path.display(),
            "Failed to remove temporary file"
        );
    }
}
