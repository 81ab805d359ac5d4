//! Application setup and initialization

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use tubely_core::Config;
use tubely_db::{setup_database, VideoRepository};
use tubely_processing::{
    FfmpegTools, MediaTools, PipelineConfig, VideoRecordStore, VideoUploadPipeline,
};
use tubely_storage::create_storage;

use crate::auth::JwtService;
use crate::state::AppState;
use crate::video_store_impl::PgVideoRecordStore;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;
    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let pool = setup_database(&config).await?;
    let records: Arc<dyn VideoRecordStore> =
        Arc::new(PgVideoRecordStore::new(VideoRepository::new(pool)));

    let storage = create_storage(&config)
        .await
        .context("Failed to initialize storage")?;

    let tools: Arc<dyn MediaTools> = Arc::new(
        FfmpegTools::new(config.ffmpeg_path(), config.ffprobe_path())
            .context("Invalid ffmpeg/ffprobe configuration")?,
    );

    let pipeline_config = pipeline_config(&config).await?;
    let pipeline = Arc::new(VideoUploadPipeline::new(
        pipeline_config,
        tools,
        storage.clone(),
        records.clone(),
    ));

    let state = Arc::new(AppState {
        jwt: Arc::new(JwtService::new(config.jwt_secret())),
        config,
        pipeline,
        records,
        storage,
    });

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}

/// Derive the pipeline settings, creating the temp directory if needed.
pub async fn pipeline_config(config: &Config) -> Result<PipelineConfig> {
    let playback_base_url = config
        .playback_base_url()
        .context("No playback base URL could be derived from the storage configuration")?;

    let temp_dir = config.upload_temp_dir();
    tokio::fs::create_dir_all(&temp_dir)
        .await
        .with_context(|| format!("Failed to create upload temp dir {}", temp_dir.display()))?;

    Ok(PipelineConfig {
        max_upload_bytes: config.max_video_size_bytes(),
        accepted_content_type: config.video_content_type().to_string(),
        temp_dir,
        playback_base_url,
    })
}
