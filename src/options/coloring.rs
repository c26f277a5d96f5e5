use serde::{Deserialize, Serialize};

use crate::color::ColorMode;

/// Coloring mode and crossfade parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColoringOptions {
    /// Active coloring scheme.
    pub color_by: ColorMode,
    /// Crossfade duration in seconds when switching schemes.
    pub crossfade_duration: f32,
}

impl Default for ColoringOptions {
    fn default() -> Self {
        Self {
            color_by: ColorMode::Element,
            crossfade_duration: 0.3,
        }
    }
}
