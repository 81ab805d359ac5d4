//! Tubely API Library
//!
//! HTTP surface of the video upload service: bearer-token auth, the upload
//! handler that drives the processing pipeline, and application setup.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
mod video_store_impl;

pub use error::HttpAppError;
pub use state::AppState;
pub use video_store_impl::PgVideoRecordStore;
