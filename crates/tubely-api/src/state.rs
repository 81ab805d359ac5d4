//! Shared application state

use std::sync::Arc;

use tubely_core::Config;
use tubely_processing::{VideoRecordStore, VideoUploadPipeline};
use tubely_storage::Storage;

use crate::auth::JwtService;

/// State handed to every handler.
///
/// The record store is held as a trait object so tests can swap the
/// Postgres-backed store for an in-memory one.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<VideoUploadPipeline>,
    pub records: Arc<dyn VideoRecordStore>,
    pub storage: Arc<dyn Storage>,
    pub jwt: Arc<JwtService>,
}
