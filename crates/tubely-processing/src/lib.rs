//! Tubely Processing Library
//!
//! Everything between an inbound upload and a published playback URL:
//! fast-start remuxing and probing through `ffmpeg`/`ffprobe`, orientation
//! classification, and the upload pipeline that drives them.

pub mod orientation;
pub mod ratio;
pub mod upload;
pub mod validator;
pub mod video;

pub use orientation::Orientation;
pub use upload::{
    PipelineConfig, TempArtifact, UploadError, UploadErrorKind, UploadOutcome, UploadRequest,
    VideoRecordStore, VideoUploadPipeline,
};
pub use validator::{MediaValidator, ValidationError};
pub use video::{FfmpegTools, MediaError, MediaTools, StreamMetadata};
