use std::path::PathBuf;

/// Failures of the external media tools
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("{tool} exited with {status}: {stderr}")]
    CommandFailed {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed probe output: {0}")]
    MalformedProbeOutput(#[source] serde_json::Error),

    #[error("No video stream found")]
    NoVideoStream,

    #[error("Remux output missing: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("Invalid tool path: {0}")]
    InvalidToolPath(String),
}
