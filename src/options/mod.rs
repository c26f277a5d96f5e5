//! Centralized rendering-state options with TOML preset support.
//!
//! All tweakable settings (lighting/shadow toggles, coloring mode and
//! crossfade, grid sizing, reprojection) are consolidated here. Options
//! serialize to/from TOML for view presets.

mod coloring;
mod grid;
mod lighting;
mod reprojection;

use std::path::Path;

pub use coloring::ColoringOptions;
pub use grid::GridOptions;
pub use lighting::LightingOptions;
pub use reprojection::ReprojectionOptions;
use serde::{Deserialize, Serialize};

use crate::error::MolframeError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[lighting]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Shadow and depth-cueing parameters.
    pub lighting: LightingOptions,
    /// Coloring mode and crossfade parameters.
    pub coloring: ColoringOptions,
    /// Spatial grid build parameters.
    pub grid: GridOptions,
    /// Temporal reprojection parameters.
    pub reprojection: ReprojectionOptions,
}

impl Options {
    /// Parse options from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, MolframeError> {
        toml::from_str(toml_str)
            .map_err(|e| MolframeError::OptionsParse(e.to_string()))
    }

    /// Serialize options to a TOML string.
    pub fn to_toml(&self) -> Result<String, MolframeError> {
        toml::to_string_pretty(self)
            .map_err(|e| MolframeError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML preset file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MolframeError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Save options to a TOML preset file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MolframeError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorMode;

    #[test]
    fn test_toml_round_trip() {
        let mut options = Options::default();
        options.lighting.shadow_strength = 0.7;
        options.coloring.color_by = ColorMode::Subunit;
        options.grid.cells_per_axis = Some(12);

        let serialized = options.to_toml().unwrap();
        let parsed = Options::from_toml(&serialized).unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let options =
            Options::from_toml("[lighting]\nshadow_strength = 0.9\n")
                .unwrap();
        assert_eq!(options.lighting.shadow_strength, 0.9);
        assert!(options.lighting.has_shadows);
        assert_eq!(options.coloring, ColoringOptions::default());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            Options::from_toml("not valid toml ["),
            Err(MolframeError::OptionsParse(_))
        ));
    }
}
