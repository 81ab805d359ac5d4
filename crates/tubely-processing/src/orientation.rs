//! Orientation buckets for uploaded videos.

use serde::{Deserialize, Serialize};
use std::fmt;

// Integer quotients: 16 / 9 == 1 and 9 / 16 == 0.
const LANDSCAPE_QUOTIENT: u32 = 16 / 9;
const PORTRAIT_QUOTIENT: u32 = 9 / 16;

/// Coarse orientation of a video, used as the storage key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    /// Classify by truncated integer quotient `width / height`.
    ///
    /// Quotient 1 is landscape and quotient 0 is portrait, so every
    /// `height <= width < 2 * height` pair (squares included) is landscape,
    /// every `width < height` pair is portrait, and only `width >= 2 * height`
    /// is other. A zero height yields `Other`.
    pub fn classify(width: u32, height: u32) -> Self {
        if height == 0 {
            return Orientation::Other;
        }

        match width / height {
            q if q == LANDSCAPE_QUOTIENT => Orientation::Landscape,
            q if q == PORTRAIT_QUOTIENT => Orientation::Portrait,
            _ => Orientation::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
