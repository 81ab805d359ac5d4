//! Configuration module
//!
//! Configuration is read once at startup (environment plus an optional `.env`
//! file) and handed to every component as an immutable value.

use std::env;

use crate::constants::{ACCEPTED_VIDEO_CONTENT_TYPE, MAX_VIDEO_UPLOAD_BYTES};
use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Settings shared by every Tubely binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub jwt_secret: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
}

/// Video upload service configuration
#[derive(Clone, Debug)]
pub struct UploadServiceConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    /// Public base for playback URLs, usually a CDN distribution host
    pub distribution_base_url: Option<String>,
    // Video pipeline configuration
    pub max_video_size_bytes: u64,
    pub video_content_type: String,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub upload_temp_dir: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<UploadServiceConfig>);

impl Config {
    fn inner(&self) -> &UploadServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = UploadServiceConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn database_url(&self) -> &str {
        &self.inner().base.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn max_video_size_bytes(&self) -> u64 {
        self.inner().max_video_size_bytes
    }

    pub fn video_content_type(&self) -> &str {
        &self.inner().video_content_type
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    /// Directory for buffered uploads; falls back to the OS temp dir.
    pub fn upload_temp_dir(&self) -> std::path::PathBuf {
        self.inner()
            .upload_temp_dir
            .as_ref()
            .map(std::path::PathBuf::from)
            .unwrap_or_else(env::temp_dir)
    }

    /// Base that playback URLs are built from.
    ///
    /// `DISTRIBUTION_BASE_URL` wins; otherwise the public URL of the configured
    /// storage backend is used.
    pub fn playback_base_url(&self) -> Option<String> {
        let inner = self.inner();
        if let Some(base) = &inner.distribution_base_url {
            return Some(base.trim_end_matches('/').to_string());
        }

        match inner.storage_backend {
            StorageBackend::S3 => {
                let bucket = inner.s3_bucket.as_deref()?;
                match inner.s3_endpoint.as_deref() {
                    Some(endpoint) => {
                        Some(format!("{}/{}", endpoint.trim_end_matches('/'), bucket))
                    }
                    None => {
                        let region = inner.s3_region.as_deref()?;
                        Some(format!("https://{}.s3.{}.amazonaws.com", bucket, region))
                    }
                }
            }
            StorageBackend::Local => inner
                .local_storage_base_url
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_string()),
        }
    }
}

impl UploadServiceConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        const FFMPEG_PATH: &str = "ffmpeg";
        const FFPROBE_PATH: &str = "ffprobe";

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let base = BaseConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            jwt_secret: lookup("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
        };

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(s) => s.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let max_video_size_mb = lookup("MAX_VIDEO_SIZE_MB").and_then(|s| s.parse::<u64>().ok());
        let max_video_size_bytes = match max_video_size_mb {
            Some(mb) => mb.checked_mul(1024 * 1024).ok_or_else(|| {
                anyhow::anyhow!("MAX_VIDEO_SIZE_MB is too large: {} MB", mb)
            })?,
            None => MAX_VIDEO_UPLOAD_BYTES,
        };

        Ok(UploadServiceConfig {
            base,
            storage_backend,
            s3_bucket: lookup("S3_BUCKET"),
            s3_region: lookup("S3_REGION").or_else(|| lookup("AWS_REGION")),
            s3_endpoint: lookup("S3_ENDPOINT"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH"),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL"),
            distribution_base_url: lookup("DISTRIBUTION_BASE_URL"),
            max_video_size_bytes,
            video_content_type: lookup("VIDEO_CONTENT_TYPE")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|| ACCEPTED_VIDEO_CONTENT_TYPE.to_string()),
            ffmpeg_path: lookup("FFMPEG_PATH").unwrap_or_else(|| FFMPEG_PATH.to_string()),
            ffprobe_path: lookup("FFPROBE_PATH").unwrap_or_else(|| FFPROBE_PATH.to_string()),
            upload_temp_dir: lookup("UPLOAD_TEMP_DIR"),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.trim().is_empty() {
            return Err(anyhow::anyhow!("JWT_SECRET cannot be empty"));
        }

        if self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_VIDEO_SIZE_MB must be greater than 0"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when STORAGE_BACKEND=s3"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when STORAGE_BACKEND=s3"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set when STORAGE_BACKEND=local"
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("JWT_SECRET", "secret"),
        ("DATABASE_URL", "postgres://localhost/tubely"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.server_port(), 8091);
        assert_eq!(config.storage_backend(), StorageBackend::S3);
        assert_eq!(config.max_video_size_bytes(), 1 << 30);
        assert_eq!(config.video_content_type(), "video/mp4");
        assert_eq!(config.ffmpeg_path(), "ffmpeg");
        assert_eq!(config.ffprobe_path(), "ffprobe");
        assert!(!config.is_production());
    }

    #[test]
    fn test_missing_jwt_secret_fails() {
        let result = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_storage_backend_fails() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("STORAGE_BACKEND", "tape"));
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_max_video_size_from_megabytes() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("MAX_VIDEO_SIZE_MB", "5"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.max_video_size_bytes(), 5 * 1024 * 1024);
    }

    #[test]
    fn test_max_video_size_overflow_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        let too_large = (u64::MAX / 1024).to_string();
        pairs.push(("MAX_VIDEO_SIZE_MB", too_large.as_str()));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("MAX_VIDEO_SIZE_MB"));
    }

    #[test]
    fn test_playback_base_prefers_distribution() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("S3_BUCKET", "tubely-videos"),
            ("S3_REGION", "us-east-2"),
            ("DISTRIBUTION_BASE_URL", "https://d111111abcdef8.cloudfront.net/"),
        ]);
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(
            config.playback_base_url().as_deref(),
            Some("https://d111111abcdef8.cloudfront.net")
        );
    }

    #[test]
    fn test_playback_base_falls_back_to_s3_host() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([("S3_BUCKET", "tubely-videos"), ("AWS_REGION", "us-east-2")]);
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(
            config.playback_base_url().as_deref(),
            Some("https://tubely-videos.s3.us-east-2.amazonaws.com")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_local_requires_paths() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("STORAGE_BACKEND", "local"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert!(config.validate().is_err());

        pairs.extend([
            ("LOCAL_STORAGE_PATH", "/var/lib/tubely"),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:8091/assets"),
        ]);
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.playback_base_url().as_deref(),
            Some("http://localhost:8091/assets")
        );
    }
}
