//! Upload API integration tests.
//!
//! Run with: `cargo test -p tubely-api --test upload_test`
//! The media tools are faked, so neither ffmpeg nor Postgres is needed.

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tubely_api::auth::JwtService;
use tubely_api::setup::routes::setup_routes;
use tubely_api::AppState;
use tubely_core::models::Video;
use tubely_core::Config;
use tubely_processing::video::faststart::output_path_for;
use tubely_processing::{
    MediaError, MediaTools, PipelineConfig, StreamMetadata, VideoRecordStore, VideoUploadPipeline,
};
use tubely_storage::LocalStorage;
use uuid::Uuid;

const JWT_SECRET: &str = "test-secret";
const BASE_URL: &str = "https://d111111abcdef8.cloudfront.net";
const MAX_UPLOAD_BYTES: u64 = 1024 * 1024;

struct FakeTools {
    width: u32,
    height: u32,
}

#[async_trait]
impl MediaTools for FakeTools {
    async fn remux_faststart(&self, input: &Path) -> Result<PathBuf, MediaError> {
        let output = output_path_for(input);
        tokio::fs::copy(input, &output)
            .await
            .map_err(|source| MediaError::Spawn {
                tool: "ffmpeg",
                source,
            })?;
        Ok(output)
    }

    async fn probe(&self, _path: &Path) -> Result<StreamMetadata, MediaError> {
        Ok(StreamMetadata {
            width: self.width,
            height: self.height,
        })
    }
}

#[derive(Default)]
struct InMemoryRecords {
    videos: Mutex<HashMap<Uuid, Video>>,
}

impl InMemoryRecords {
    fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl VideoRecordStore for InMemoryRecords {
    async fn get_video(&self, video_id: Uuid) -> anyhow::Result<Option<Video>> {
        Ok(self.get(video_id))
    }

    async fn update_video(&self, video: &Video) -> anyhow::Result<Video> {
        let stored = Video {
            updated_at: video.updated_at + Duration::seconds(1),
            ..video.clone()
        };
        self.insert(stored.clone());
        Ok(stored)
    }
}

struct TestApp {
    server: TestServer,
    records: Arc<InMemoryRecords>,
    jwt: Arc<JwtService>,
    temp_dir: TempDir,
    storage_dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage_dir = tempfile::tempdir().unwrap();
        let storage_path = storage_dir.path().display().to_string();

        let env: HashMap<&str, String> = HashMap::from([
            ("JWT_SECRET", JWT_SECRET.to_string()),
            ("DATABASE_URL", "postgres://localhost/tubely".to_string()),
            ("STORAGE_BACKEND", "local".to_string()),
            ("LOCAL_STORAGE_PATH", storage_path.clone()),
            ("LOCAL_STORAGE_BASE_URL", BASE_URL.to_string()),
        ]);
        let config = Config::from_lookup(|key| env.get(key).cloned()).unwrap();

        let storage = Arc::new(
            LocalStorage::new(storage_dir.path(), BASE_URL.to_string())
                .await
                .unwrap(),
        );
        let records = Arc::new(InMemoryRecords::default());
        let pipeline = Arc::new(VideoUploadPipeline::new(
            PipelineConfig {
                max_upload_bytes: MAX_UPLOAD_BYTES,
                accepted_content_type: "video/mp4".to_string(),
                temp_dir: temp_dir.path().to_path_buf(),
                playback_base_url: BASE_URL.to_string(),
            },
            Arc::new(FakeTools {
                width: 1920,
                height: 1080,
            }),
            storage.clone(),
            records.clone(),
        ));
        let jwt = Arc::new(JwtService::new(JWT_SECRET));

        let state = Arc::new(AppState {
            config,
            pipeline,
            records: records.clone(),
            storage,
            jwt: jwt.clone(),
        });
        let server = TestServer::new(setup_routes(state).into_make_service())
            .expect("Failed to create test server");

        Self {
            server,
            records,
            jwt,
            temp_dir,
            storage_dir,
        }
    }

    fn seed_video(&self, owner: Uuid) -> Video {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            user_id: owner,
            title: "boots".to_string(),
            description: None,
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        };
        self.records.insert(video.clone());
        video
    }

    fn bearer(&self, user_id: Uuid) -> String {
        let token = self.jwt.issue_token(user_id, Duration::hours(1)).unwrap();
        format!("Bearer {}", token)
    }

    fn leftover_temp_files(&self) -> usize {
        std::fs::read_dir(self.temp_dir.path()).unwrap().count()
    }

    fn storage_is_empty(&self) -> bool {
        std::fs::read_dir(self.storage_dir.path())
            .unwrap()
            .next()
            .is_none()
    }
}

fn video_form(bytes: Vec<u8>, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes)
        .file_name("boots.mp4")
        .mime_type(mime_type);
    MultipartForm::new().add_part("video", part)
}

fn upload_path(video_id: Uuid) -> String {
    format!("/api/videos/{}/upload", video_id)
}

#[tokio::test]
async fn test_upload_publishes_playback_url() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner);

    let response = app
        .server
        .post(&upload_path(video.id))
        .add_header("Authorization", app.bearer(owner))
        .multipart(video_form(vec![7u8; 64 * 1024], "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Video = response.json();
    let video_url = body.video_url.expect("video_url should be set");
    assert!(video_url.starts_with(&format!("{}/landscape/", BASE_URL)));
    assert!(video_url.ends_with(".mp4"));
    assert_eq!(body.id, video.id);
    assert_eq!(body.title, video.title);

    let stored = app.records.get(video.id).unwrap();
    assert_eq!(stored.video_url.as_deref(), Some(video_url.as_str()));
    assert_eq!(body.updated_at, stored.updated_at);
    assert!(body.updated_at > video.updated_at);
    assert_eq!(app.leftover_temp_files(), 0);

    let key = video_url.trim_start_matches(&format!("{}/", BASE_URL));
    let object = std::fs::read(app.storage_dir.path().join(key)).unwrap();
    assert_eq!(object.len(), 64 * 1024);
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = TestApp::new().await;
    let video = app.seed_video(Uuid::new_v4());

    let response = app
        .server
        .post(&upload_path(video.id))
        .multipart(video_form(vec![1u8; 1024], "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert!(app.storage_is_empty());
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner);
    let forged = JwtService::new("another-secret")
        .issue_token(owner, Duration::hours(1))
        .unwrap();

    let response = app
        .server
        .post(&upload_path(video.id))
        .add_header("Authorization", format!("Bearer {}", forged))
        .multipart(video_form(vec![1u8; 1024], "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_owner_is_rejected() {
    let app = TestApp::new().await;
    let video = app.seed_video(Uuid::new_v4());

    let response = app
        .server
        .post(&upload_path(video.id))
        .add_header("Authorization", app.bearer(Uuid::new_v4()))
        .multipart(video_form(vec![1u8; 1024], "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Not your video");
    assert!(app.records.get(video.id).unwrap().video_url.is_none());
    assert!(app.storage_is_empty());
}

#[tokio::test]
async fn test_unknown_video_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post(&upload_path(Uuid::new_v4()))
        .add_header("Authorization", app.bearer(Uuid::new_v4()))
        .multipart(video_form(vec![1u8; 1024], "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_video_id_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/videos/not-a-uuid/upload")
        .add_header("Authorization", app.bearer(Uuid::new_v4()))
        .multipart(video_form(vec![1u8; 1024], "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_content_type_is_bad_request() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner);

    let response = app
        .server
        .post(&upload_path(video.id))
        .add_header("Authorization", app.bearer(owner))
        .multipart(video_form(vec![1u8; 1024], "video/quicktime"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(app.leftover_temp_files(), 0);
    assert!(app.storage_is_empty());
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner);
    let oversized = vec![0u8; (MAX_UPLOAD_BYTES + MAX_UPLOAD_BYTES / 2) as usize];

    let response = app
        .server
        .post(&upload_path(video.id))
        .add_header("Authorization", app.bearer(owner))
        .multipart(video_form(oversized, "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.leftover_temp_files(), 0);
    assert!(app.storage_is_empty());
    assert!(app.records.get(video.id).unwrap().video_url.is_none());
}

#[tokio::test]
async fn test_missing_video_field_is_bad_request() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner);
    let form = MultipartForm::new().add_text("title", "boots");

    let response = app
        .server
        .post(&upload_path(video.id))
        .add_header("Authorization", app.bearer(owner))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_dependencies() {
    let app = TestApp::new().await;

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["storage"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get("/health")
        .add_header("X-Request-ID", "req-123")
        .await;

    assert_eq!(response.header("X-Request-ID"), "req-123");
}
