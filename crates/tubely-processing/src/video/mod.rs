//! Video tooling: fast-start remux and stream probing through ffmpeg/ffprobe.

pub mod error;
pub mod faststart;
pub mod ffmpeg;
pub mod probe;
pub mod traits;

pub use error::MediaError;
pub use ffmpeg::FfmpegTools;
pub use probe::{parse_probe_output, StreamMetadata};
pub use traits::MediaTools;
