//! Uniform spatial grid over an atom cloud for SDF/occlusion queries.
//!
//! The grid is cubic, covers the structure's padded bounding box, and maps
//! every atom to exactly one cell. Cell contents are stored in a compact
//! offsets-plus-indices layout built with a two-pass counting sort, so a
//! rebuild does a fixed number of allocations regardless of atom count.
//! Rebuilds go through [`GridSlot`], which swaps a fully built grid in
//! atomically and keeps the previous grid alive on failure.

use std::fmt;
use std::sync::Arc;

use glam::Vec3;

use crate::atom::BoundingBox;

/// Hard ceiling on total cell count, checked before any allocation.
pub const MAX_GRID_CELLS: usize = 1 << 28;

/// Smallest physical grid side in Ångströms, used when the atom cloud is
/// degenerate (single point, or all atoms coincident).
const MIN_SIDE_LENGTH: f32 = 1.0;

/// Grid resolution policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridSizing {
    /// Fixed number of cells per axis.
    CellsPerAxis(u32),
    /// Derive cells per axis from a target average atom count per cell.
    AtomsPerCell(f32),
}

/// Spatial grid build parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Resolution policy.
    pub sizing: GridSizing,
    /// Relative margin added around the bounding box, so SDF evaluation
    /// near the structure surface never samples outside the grid.
    pub margin: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            sizing: GridSizing::AtomsPerCell(8.0),
            margin: 0.05,
        }
    }
}

/// Spatial grid build failure. The caller's previous grid stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridBuildError {
    /// The requested resolution would exceed [`MAX_GRID_CELLS`] cells.
    TooManyCells {
        /// Requested cells per axis.
        resolution: u32,
    },
    /// Allocation of the cell-to-atom mapping failed.
    OutOfMemory,
    /// More atoms than the index storage can address.
    TooManyAtoms,
}

impl fmt::Display for GridBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyCells { resolution } => {
                write!(
                    f,
                    "grid resolution {resolution} exceeds the cell budget"
                )
            }
            Self::OutOfMemory => {
                write!(f, "failed to allocate the cell-to-atom mapping")
            }
            Self::TooManyAtoms => {
                write!(f, "atom count exceeds index storage range")
            }
        }
    }
}

impl std::error::Error for GridBuildError {}

/// SDF grid descriptor read by the backend as a raw uniform block.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SdfGridDescriptor {
    /// Number of cells per grid side.
    pub grid_resolution: i32,
    /// Grid side size (in Ångströms).
    pub grid_size: f32,
    /// Number of atoms contained inside the grid.
    pub number_of_atoms: i32,
}

/// Uniform cubic grid with per-cell atom index lists.
///
/// Immutable once built; queries are safe on any well-formed grid,
/// including one built from zero atoms. Ordering inside a cell is
/// unspecified.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    resolution: u32,
    cell_size: f32,
    origin: Vec3,
    side_length: f32,
    /// CSR offsets, length `resolution³ + 1`.
    cell_offsets: Vec<u32>,
    /// Atom indices grouped by cell.
    atom_indices: Vec<u32>,
}

impl SpatialGrid {
    /// A well-formed grid indexing no atoms.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            resolution: 1,
            cell_size: MIN_SIDE_LENGTH,
            origin: Vec3::splat(-0.5 * MIN_SIDE_LENGTH),
            side_length: MIN_SIDE_LENGTH,
            cell_offsets: vec![0, 0],
            atom_indices: Vec::new(),
        }
    }

    /// Build a grid over the given atom positions.
    ///
    /// Linear in atom count. Storage is sized once up front; if sizing
    /// fails the error is returned without touching any existing grid.
    pub fn build(
        positions: &[Vec3],
        config: &GridConfig,
    ) -> Result<Self, GridBuildError> {
        if u32::try_from(positions.len()).is_err() {
            return Err(GridBuildError::TooManyAtoms);
        }
        let Some(aabb) = BoundingBox::from_positions(positions) else {
            return Ok(Self::empty());
        };

        let extent = aabb.extent();
        let max_extent = extent.x.max(extent.y).max(extent.z);
        let margin = config.margin.max(0.0);
        let side_length =
            (max_extent * (1.0 + margin)).max(MIN_SIDE_LENGTH);

        let resolution = resolve_resolution(config.sizing, positions.len())?;
        let cell_count = (resolution as usize).pow(3);
        let cell_size = side_length / resolution as f32;
        let origin = aabb.center() - Vec3::splat(side_length * 0.5);

        // Pass 1: count atoms per cell.
        let mut counts: Vec<u32> = Vec::new();
        counts
            .try_reserve_exact(cell_count + 1)
            .map_err(|_| GridBuildError::OutOfMemory)?;
        counts.resize(cell_count + 1, 0);

        let mut atom_indices: Vec<u32> = Vec::new();
        atom_indices
            .try_reserve_exact(positions.len())
            .map_err(|_| GridBuildError::OutOfMemory)?;
        atom_indices.resize(positions.len(), 0);

        let grid_shape = GridShape {
            resolution,
            cell_size,
            origin,
        };
        for position in positions {
            counts[grid_shape.clamped_cell_index(*position)] += 1;
        }

        // Exclusive prefix sum turns counts into CSR offsets.
        let mut running = 0u32;
        for slot in &mut counts {
            let count = *slot;
            *slot = running;
            running += count;
        }
        let cell_offsets = counts;

        // Pass 2: scatter atom indices into their cells.
        let mut cursors = cell_offsets.clone();
        for (atom_index, position) in positions.iter().enumerate() {
            let cell = grid_shape.clamped_cell_index(*position);
            atom_indices[cursors[cell] as usize] = atom_index as u32;
            cursors[cell] += 1;
        }

        Ok(Self {
            resolution,
            cell_size,
            origin,
            side_length,
            cell_offsets,
            atom_indices,
        })
    }

    /// Cells per axis.
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Cell edge length in Ångströms.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Physical grid side length in Ångströms.
    #[must_use]
    pub fn side_length(&self) -> f32 {
        self.side_length
    }

    /// Minimum corner of the grid volume.
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Number of atoms indexed by the grid.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atom_indices.len()
    }

    /// Number of cells holding at least one atom.
    #[must_use]
    pub fn occupied_cell_count(&self) -> usize {
        self.cell_offsets
            .windows(2)
            .filter(|pair| pair[1] > pair[0])
            .count()
    }

    /// Integer cell coordinates containing a position, or `None` if the
    /// position lies outside the grid volume.
    #[must_use]
    pub fn cell_containing(&self, position: Vec3) -> Option<[u32; 3]> {
        let local = (position - self.origin) / self.cell_size;
        let resolution = self.resolution as f32;
        if local.x < 0.0
            || local.y < 0.0
            || local.z < 0.0
            || local.x >= resolution
            || local.y >= resolution
            || local.z >= resolution
        {
            return None;
        }
        Some([local.x as u32, local.y as u32, local.z as u32])
    }

    /// Atom indices stored in a cell. Out-of-range coordinates yield an
    /// empty slice.
    #[must_use]
    pub fn atoms_in_cell(&self, cell: [u32; 3]) -> &[u32] {
        let [x, y, z] = cell;
        if x >= self.resolution || y >= self.resolution || z >= self.resolution
        {
            return &[];
        }
        let index = self.linear_index(cell);
        let start = self.cell_offsets[index] as usize;
        let end = self.cell_offsets[index + 1] as usize;
        &self.atom_indices[start..end]
    }

    /// Index of the atom nearest to `position`, searching outward from
    /// the containing cell one shell at a time.
    ///
    /// `positions` must be the same slice the grid was built from.
    #[must_use]
    pub fn nearest_atom(
        &self,
        position: Vec3,
        positions: &[Vec3],
    ) -> Option<u32> {
        if self.atom_indices.is_empty() {
            return None;
        }
        let center = self.nearest_cell(position);
        let mut best: Option<(u32, f32)> = None;

        for shell in 0..self.resolution {
            // A hit in shell r can still be beaten by Euclidean distance in
            // shell r+1, so finish one extra shell before stopping.
            if let Some((_, best_dist)) = best {
                let shell_floor =
                    (shell.saturating_sub(1)) as f32 * self.cell_size;
                if shell_floor * shell_floor > best_dist {
                    break;
                }
            }
            self.scan_shell(center, shell, |atom_index| {
                let dist = positions
                    .get(atom_index as usize)
                    .map_or(f32::INFINITY, |p| p.distance_squared(position));
                if best.is_none_or(|(_, d)| dist < d) {
                    best = Some((atom_index, dist));
                }
            });
        }
        best.map(|(index, _)| index)
    }

    /// Descriptor block handed to the backend.
    #[must_use]
    pub fn descriptor(&self) -> SdfGridDescriptor {
        SdfGridDescriptor {
            grid_resolution: self.resolution as i32,
            grid_size: self.side_length,
            number_of_atoms: self.atom_indices.len() as i32,
        }
    }

    fn linear_index(&self, cell: [u32; 3]) -> usize {
        let [x, y, z] = cell.map(|c| c as usize);
        let resolution = self.resolution as usize;
        (z * resolution + y) * resolution + x
    }

    /// Cell coordinates nearest to a position, clamped into the grid.
    fn nearest_cell(&self, position: Vec3) -> [u32; 3] {
        let shape = GridShape {
            resolution: self.resolution,
            cell_size: self.cell_size,
            origin: self.origin,
        };
        shape.clamped_cell(position)
    }

    /// Visit every atom in cells at Chebyshev distance `shell` from
    /// `center`.
    fn scan_shell(
        &self,
        center: [u32; 3],
        shell: u32,
        mut visit: impl FnMut(u32),
    ) {
        let resolution = i64::from(self.resolution);
        let shell = i64::from(shell);
        let center = center.map(i64::from);
        for dz in -shell..=shell {
            let z = center[2] + dz;
            if z < 0 || z >= resolution {
                continue;
            }
            for dy in -shell..=shell {
                let y = center[1] + dy;
                if y < 0 || y >= resolution {
                    continue;
                }
                for dx in -shell..=shell {
                    // Only the shell surface; inner cells were already
                    // visited at smaller radii.
                    if dx.abs().max(dy.abs()).max(dz.abs()) != shell {
                        continue;
                    }
                    let x = center[0] + dx;
                    if x < 0 || x >= resolution {
                        continue;
                    }
                    let cell = [x as u32, y as u32, z as u32];
                    for &atom_index in self.atoms_in_cell(cell) {
                        visit(atom_index);
                    }
                }
            }
        }
    }
}

/// Geometry-only view of the grid used during binning.
#[derive(Clone, Copy)]
struct GridShape {
    resolution: u32,
    cell_size: f32,
    origin: Vec3,
}

impl GridShape {
    fn clamped_cell(&self, position: Vec3) -> [u32; 3] {
        let max_cell = (self.resolution - 1) as f32;
        let local = ((position - self.origin) / self.cell_size)
            .clamp(Vec3::ZERO, Vec3::splat(max_cell));
        [local.x as u32, local.y as u32, local.z as u32]
    }

    fn clamped_cell_index(&self, position: Vec3) -> usize {
        let [x, y, z] = self.clamped_cell(position).map(|c| c as usize);
        let resolution = self.resolution as usize;
        (z * resolution + y) * resolution + x
    }
}

/// Cells per axis for a sizing policy and atom count.
fn resolve_resolution(
    sizing: GridSizing,
    atom_count: usize,
) -> Result<u32, GridBuildError> {
    // Largest resolution whose cube stays within the cell budget.
    let max_resolution = (MAX_GRID_CELLS as f64).cbrt().floor() as u32;
    match sizing {
        GridSizing::CellsPerAxis(resolution) => {
            if resolution == 0 || resolution > max_resolution {
                return Err(GridBuildError::TooManyCells { resolution });
            }
            Ok(resolution)
        }
        GridSizing::AtomsPerCell(density) => {
            let density = if density.is_finite() && density > 0.0 {
                density
            } else {
                1.0
            };
            let cells = (atom_count as f64 / f64::from(density)).max(1.0);
            let resolution = cells.cbrt().round() as u32;
            Ok(resolution.clamp(1, max_resolution))
        }
    }
}

/// Generation-counted owner of the current spatial grid.
///
/// Rebuilds construct the new grid off to the side, then replace the
/// shared handle in one step; backend readers keep their [`Arc`] for the
/// frame and never observe a partially built grid. A failed rebuild
/// leaves the previous grid (and generation) untouched.
#[derive(Debug)]
pub struct GridSlot {
    current: Arc<SpatialGrid>,
    generation: u64,
}

impl GridSlot {
    /// Slot holding an empty grid at generation zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Arc::new(SpatialGrid::empty()),
            generation: 0,
        }
    }

    /// Rebuild from the given positions, swapping in the new grid on
    /// success and returning the new generation.
    pub fn rebuild(
        &mut self,
        positions: &[Vec3],
        config: &GridConfig,
    ) -> Result<u64, GridBuildError> {
        let grid = SpatialGrid::build(positions, config)?;
        log::debug!(
            "grid rebuilt: {} cells/axis, {} atoms, {} occupied cells",
            grid.resolution(),
            grid.atom_count(),
            grid.occupied_cell_count()
        );
        self.current = Arc::new(grid);
        self.generation += 1;
        Ok(self.generation)
    }

    /// Shared handle to the current grid.
    #[must_use]
    pub fn grid(&self) -> Arc<SpatialGrid> {
        Arc::clone(&self.current)
    }

    /// Generation of the current grid; bumps once per successful rebuild.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for GridSlot {
    fn default() -> Self {
        Self::new()
    }
}
