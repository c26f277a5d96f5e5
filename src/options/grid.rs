use serde::{Deserialize, Serialize};

use crate::grid::{GridConfig, GridSizing};

/// Spatial grid build parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridOptions {
    /// Relative margin added around the structure's bounding box.
    pub margin: f32,
    /// Target average atom count per cell, used when `cells_per_axis`
    /// is unset.
    pub atoms_per_cell: f32,
    /// Fixed cells per axis, overriding the density target.
    pub cells_per_axis: Option<u32>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            margin: 0.05,
            atoms_per_cell: 8.0,
            cells_per_axis: None,
        }
    }
}

impl GridOptions {
    /// Build parameters for the grid builder.
    #[must_use]
    pub fn to_config(&self) -> GridConfig {
        let sizing = self.cells_per_axis.map_or(
            GridSizing::AtomsPerCell(self.atoms_per_cell),
            GridSizing::CellsPerAxis,
        );
        GridConfig {
            sizing,
            margin: self.margin,
        }
    }
}
