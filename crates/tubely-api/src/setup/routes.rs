//! Router assembly

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tubely_infra::request_id_middleware;

use crate::auth::auth_middleware;
use crate::handlers::{health::health_check, video_upload::upload_video};
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the video itself.
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

fn upload_body_limit(state: &AppState) -> usize {
    let limit = state
        .pipeline
        .config()
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    usize::try_from(limit).unwrap_or(usize::MAX)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

fn protected_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let body_limit = upload_body_limit(state);

    Router::new()
        .route("/api/videos/{video_id}/upload", post(upload_video))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .route_layer(axum::middleware::from_fn_with_state(
            state.jwt.clone(),
            auth_middleware,
        ))
}

pub fn setup_routes(state: Arc<AppState>) -> Router {
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1_000)
        .max(1);

    public_routes()
        .merge(protected_routes(&state))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}
