//! Storage key generation.
//!
//! Every uploaded object gets a fresh key `{prefix}/{random}.{ext}`. The random
//! part is 32 bytes from the OS CSPRNG rendered as URL-safe base64 without
//! padding, so keys are unguessable and safe to embed in URLs unescaped.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use std::fmt;

const RANDOM_KEY_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Generate a new random key under `prefix`.
    pub fn generate(prefix: &str, extension: &str) -> Self {
        let mut bytes = [0u8; RANDOM_KEY_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let random = URL_SAFE_NO_PAD.encode(bytes);

        let prefix = prefix.trim_matches('/');
        let extension = extension.trim_start_matches('.');
        if prefix.is_empty() {
            StorageKey(format!("{}.{}", random, extension))
        } else {
            StorageKey(format!("{}/{}.{}", prefix, random, extension))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
