use serde::{Deserialize, Serialize};

use crate::reprojection::DEFAULT_SEQUENCE_LENGTH;

/// Temporal reprojection parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReprojectionOptions {
    /// Jitter samples before the sequence wraps.
    pub sequence_length: u32,
}

impl Default for ReprojectionOptions {
    fn default() -> Self {
        Self {
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
        }
    }
}
