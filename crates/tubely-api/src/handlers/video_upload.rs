use std::io;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_processing::UploadRequest;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Multipart field carrying the video bytes.
pub const VIDEO_FORM_FIELD: &str = "video";

/// `POST /api/videos/{video_id}/upload`
///
/// Streams the `video` form field through the upload pipeline and returns the
/// updated record.
#[tracing::instrument(skip_all, fields(video_id = %video_id, user_id = %user.user_id))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id)
        .map_err(|_| AppError::InvalidInput("Invalid video ID".to_string()))?;

    let video = state
        .records
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user.user_id) {
        return Err(AppError::Unauthorized("Not your video".to_string()).into());
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(VIDEO_FORM_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let body = StreamReader::new(Box::pin(field.map_err(io::Error::other)));

        let outcome = state
            .pipeline
            .run(UploadRequest {
                video_id,
                uploader_id: user.user_id,
                content_type,
                content_length: None,
                body,
            })
            .await?;

        return Ok(Json(outcome.video));
    }

    Err(AppError::BadRequest(format!("Missing form field '{}'", VIDEO_FORM_FIELD)).into())
}
