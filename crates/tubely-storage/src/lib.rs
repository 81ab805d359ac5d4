//! Tubely Storage Library
//!
//! Storage abstraction plus the S3 and local filesystem backends that uploaded
//! videos end up in.
//!
//! # Storage key format
//!
//! Keys are `{orientation}/{random}.{ext}` where `random` is 32 bytes from the
//! OS CSPRNG encoded as unpadded URL-safe base64 (see [`StorageKey`]). Keys
//! never contain `..` or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::StorageKey;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
