//! Application-wide constants.

/// Upper bound on a single video upload (1 GiB).
pub const MAX_VIDEO_UPLOAD_BYTES: u64 = 1 << 30;

/// The only container format the upload pipeline accepts.
pub const ACCEPTED_VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// File extension appended to every stored video key.
pub const VIDEO_KEY_EXTENSION: &str = "mp4";

/// Issuer expected in access tokens.
pub const ACCESS_TOKEN_ISSUER: &str = "tubely-access";
