//! Database repositories for data access layer
//!
//! Postgres-backed persistence for video records, plus pool setup and
//! migrations.

pub mod pool;
pub mod video;

pub use pool::setup_database;
pub use video::VideoRepository;
