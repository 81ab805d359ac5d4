//! Upload pipeline: validate → buffer → remux → probe → classify → store → publish.

pub mod artifact;
pub mod error;
pub mod pipeline;
pub mod traits;
pub mod types;

pub use artifact::TempArtifact;
pub use error::{UploadError, UploadErrorKind};
pub use pipeline::VideoUploadPipeline;
pub use traits::VideoRecordStore;
pub use types::{PipelineConfig, UploadOutcome, UploadRequest};
