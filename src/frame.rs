//! Per-frame record assembly.
//!
//! [`FrameData`] is the flat uniform block the backend reads as raw bytes;
//! [`FrameStateAssembler`] produces one per displayed frame from the
//! camera, the lighting options, the coloring state, and the spatial grid.

use bytemuck::Zeroable;
use glam::{Mat4, Vec3, Vec4};

use crate::atom::{AtomRecord, BoundingSphere, BoundingVolume};
use crate::color::{
    ColorBlendResolver, ColorCrossfade, ColorMode, ColorModeWeights,
    ResolvedAtomColor, ATOM_TYPE_COUNT, MAX_ELEMENT_COLORS,
    MAX_RESIDUE_COLORS, MAX_SS_COLORS, MAX_SUBUNIT_COLORS,
};
use crate::error::MolframeError;
use crate::grid::{GridSlot, SdfGridDescriptor, SpatialGrid};
use crate::options::Options;
use crate::reprojection::{ReprojectionData, ReprojectionPlanner};

/// Inset applied when fitting the shadow projection to the bounding
/// sphere, in Ångströms.
const SHADOW_FIT_INSET: f32 = 3.3;

/// Depth bias span in Ångströms, converted to normalized device units
/// against the camera depth range each frame.
const DEPTH_BIAS_ANGSTROMS: f32 = 2.0;

/// Per-frame uniform block handed to the rendering backend.
///
/// The backend reads this as a flat byte block: field offsets and order
/// are part of the binary contract and stay fixed within a session.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameData {
    /// Model to view matrix.
    pub model_view_matrix: [[f32; 4]; 4],
    /// Inverse model to view matrix.
    pub inverse_model_view_matrix: [[f32; 4]; 4],
    /// Projection matrix.
    pub projection_matrix: [[f32; 4]; 4],
    /// Model rotation matrix (includes the translate-to-origin step).
    pub rotation_matrix: [[f32; 4]; 4],
    /// Inverse of the user rotation alone.
    pub inverse_rotation_matrix: [[f32; 4]; 4],
    /// Orthographic projection used by the shadow pass.
    pub shadow_projection_matrix: [[f32; 4]; 4],
    /// Model rotation into the sun's frame of reference.
    pub sun_rotation_matrix: [[f32; 4]; 4],
    /// Inverse of [`FrameData::sun_rotation_matrix`].
    pub inverse_sun_rotation_matrix: [[f32; 4]; 4],
    /// Camera space to shadow projection space.
    pub camera_to_shadow_projection_matrix: [[f32; 4]; 4],
    /// Resolved element colors, indexed by atomic number.
    pub element_color: [[f32; 4]; MAX_ELEMENT_COLORS],
    /// Resolved subunit colors.
    pub subunit_color: [[f32; 4]; MAX_SUBUNIT_COLORS],
    /// Resolved residue colors.
    pub residue_color: [[f32; 4]; MAX_RESIDUE_COLORS],
    /// Resolved secondary-structure colors.
    pub secondary_structure_color: [[f32; 4]; MAX_SS_COLORS],
    /// Per-mode blend weights, in [`ColorMode::ALL`] order.
    pub color_weights: [f32; ColorMode::COUNT],
    /// Displayed atomic radii, indexed by atomic number.
    pub atom_radii: [f32; ATOM_TYPE_COUNT],
    /// Whether shadows are cast between geometry elements (0 or 1).
    pub has_shadows: u32,
    /// Shadow darkening strength in [0, 1].
    pub shadow_strength: f32,
    /// Whether depth cueing is applied (0 or 1).
    pub has_depth_cueing: u32,
    /// Depth cueing strength in [0, 1].
    pub depth_cueing_strength: f32,
    /// Depth comparison bias in normalized device units.
    pub depth_bias: f32,
    /// Padding for 16-byte block alignment.
    pub _pad: [f32; 3],
    /// Temporal reprojection record.
    pub reprojection: ReprojectionData,
}

impl Default for FrameData {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            model_view_matrix: identity,
            inverse_model_view_matrix: identity,
            projection_matrix: identity,
            rotation_matrix: identity,
            inverse_rotation_matrix: identity,
            shadow_projection_matrix: identity,
            sun_rotation_matrix: identity,
            inverse_sun_rotation_matrix: identity,
            camera_to_shadow_projection_matrix: identity,
            reprojection: ReprojectionData {
                reprojection_matrix: identity,
                ..ReprojectionData::zeroed()
            },
            ..Self::zeroed()
        }
    }
}

/// Caller-supplied camera transforms for one frame.
#[derive(Debug, Clone, Copy)]
pub struct CameraMatrices {
    /// Model to view matrix (camera translation).
    pub model_view: Mat4,
    /// Projection matrix.
    pub projection: Mat4,
    /// User model rotation about the structure's center.
    pub rotation: Mat4,
}

impl Default for CameraMatrices {
    fn default() -> Self {
        Self {
            model_view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            rotation: Mat4::IDENTITY,
        }
    }
}

/// Everything the assembler needs from the caller for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    /// The displayed atom set.
    pub atoms: &'a [AtomRecord],
    /// Whether the atom set or visualization geometry changed since the
    /// previous frame (triggers a grid rebuild and color re-resolution).
    pub geometry_changed: bool,
    /// Camera transforms.
    pub camera: CameraMatrices,
    /// Camera position in world space.
    pub camera_position: Vec3,
    /// Near clipping plane distance.
    pub near_plane: f32,
    /// Far clipping plane distance.
    pub far_plane: f32,
}

/// Rotation matrix with the handedness the shadow math expects.
fn rotation_lh(radians: f32, axis: Vec3) -> Mat4 {
    Mat4::from_axis_angle(axis.normalize_or(Vec3::X), -radians)
}

/// Model-to-sun-frame rotation from the sun's spherical direction.
#[must_use]
pub fn sun_rotation(theta: f32, phi: f32) -> Mat4 {
    let phi_rotation = rotation_lh(phi, Vec3::new(-1.0, 0.0, 0.0));
    let original_y_direction =
        phi_rotation.inverse() * Vec4::new(0.0, -1.0, 0.0, 1.0);
    let theta_rotation = rotation_lh(theta, original_y_direction.truncate());
    theta_rotation * phi_rotation
}

/// Orthographic shadow projection fitted to the structure's bounding
/// sphere. Degenerate spheres yield the identity.
#[must_use]
pub fn shadow_projection_for(sphere: &BoundingSphere) -> Mat4 {
    let radius = sphere.radius;
    if radius <= 0.0 {
        return Mat4::IDENTITY;
    }
    let inset = SHADOW_FIT_INSET.min(radius * 0.5);
    Mat4::orthographic_rh(
        -radius + inset,
        radius - inset,
        -radius + inset,
        radius - inset,
        -radius - inset,
        radius + inset,
    )
}

/// Fixed depth bias expressed in normalized device units against the
/// camera depth range.
#[must_use]
pub fn depth_bias_for(near_plane: f32, far_plane: f32) -> f32 {
    let span = far_plane - near_plane;
    if span > 0.0 {
        DEPTH_BIAS_ANGSTROMS / span
    } else {
        0.0
    }
}

/// Produces the per-frame [`FrameData`] record.
///
/// Owns the components whose state spans frames: the blend resolver and
/// its crossfade, the reprojection planner, and the spatial grid slot.
/// One [`FrameStateAssembler::assemble`] call per displayed frame.
#[derive(Debug)]
pub struct FrameStateAssembler {
    options: Options,
    resolver: ColorBlendResolver,
    crossfade: ColorCrossfade,
    planner: ReprojectionPlanner,
    grid_slot: GridSlot,
    bounding: BoundingVolume,
    resolved_colors: Vec<ResolvedAtomColor>,
    last_weights: Option<ColorModeWeights>,
    positions: Vec<Vec3>,
    frame: u64,
}

impl FrameStateAssembler {
    /// Assembler for a render target of the given pixel dimensions.
    #[must_use]
    pub fn new(options: Options, width: u32, height: u32) -> Self {
        let mut crossfade = ColorCrossfade::new(options.coloring.color_by);
        crossfade.set_duration(options.coloring.crossfade_duration);
        let planner = ReprojectionPlanner::new(width, height)
            .with_sequence_length(options.reprojection.sequence_length);
        Self {
            resolver: ColorBlendResolver::default(),
            crossfade,
            planner,
            grid_slot: GridSlot::new(),
            bounding: BoundingVolume::zero(),
            resolved_colors: Vec::new(),
            last_weights: None,
            positions: Vec::new(),
            options,
            frame: 0,
        }
    }

    /// Notify of a render-target resize; takes effect on the next frame.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.planner.resize(width, height);
    }

    /// Switch the coloring mode with a crossfade.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.options.coloring.color_by = mode;
        self.crossfade.fade_to(mode);
    }

    /// Current runtime options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Mutable runtime options (lighting toggles, strengths).
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// The blend resolver, for palette edits.
    pub fn resolver_mut(&mut self) -> &mut ColorBlendResolver {
        &mut self.resolver
    }

    /// Shared handle to the current spatial grid.
    #[must_use]
    pub fn grid(&self) -> std::sync::Arc<SpatialGrid> {
        self.grid_slot.grid()
    }

    /// Generation of the current grid.
    #[must_use]
    pub fn grid_generation(&self) -> u64 {
        self.grid_slot.generation()
    }

    /// SDF descriptor of the current grid.
    #[must_use]
    pub fn sdf_descriptor(&self) -> SdfGridDescriptor {
        self.grid_slot.grid().descriptor()
    }

    /// Per-atom colors resolved by the last
    /// [`FrameStateAssembler::assemble`] call.
    #[must_use]
    pub fn resolved_colors(&self) -> &[ResolvedAtomColor] {
        &self.resolved_colors
    }

    /// Whether a color crossfade is in flight (caller should keep
    /// redrawing until it settles).
    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.crossfade.is_fading()
    }

    /// Assemble the frame record for the current frame.
    ///
    /// Rebuilds the spatial grid when the geometry changed, advances the
    /// crossfade, re-resolves atom colors when the weights moved, plans
    /// the reprojection, and merges everything into one [`FrameData`].
    /// The only hard failure is a grid rebuild error; the previous grid
    /// stays in use when that happens.
    pub fn assemble(
        &mut self,
        inputs: &FrameInputs<'_>,
    ) -> Result<FrameData, MolframeError> {
        let rebuild = inputs.geometry_changed || self.frame == 0;
        if rebuild {
            self.positions.clear();
            self.positions
                .extend(inputs.atoms.iter().map(|atom| atom.position));
            self.bounding = BoundingVolume::from_positions(&self.positions);
            let _ = self
                .grid_slot
                .rebuild(&self.positions, &self.options.grid.to_config())?;
        }

        let _ = self.crossfade.update();
        let weights = self.crossfade.weights();
        if rebuild || self.last_weights != Some(weights) {
            self.resolver.resolve_all(
                inputs.atoms,
                weights,
                &mut self.resolved_colors,
            );
            self.last_weights = Some(weights);
        }

        let record = self.build_record(inputs, weights);
        self.frame += 1;
        Ok(record)
    }

    fn build_record(
        &mut self,
        inputs: &FrameInputs<'_>,
        weights: ColorModeWeights,
    ) -> FrameData {
        let lighting = &self.options.lighting;
        let center = self.bounding.sphere.center;

        let rotation_matrix =
            inputs.camera.rotation * Mat4::from_translation(-center);
        let sun = sun_rotation(lighting.sun_theta, lighting.sun_phi);
        let sun_rotation_matrix = sun * rotation_matrix;
        let shadow_projection = shadow_projection_for(&self.bounding.sphere);
        let camera_to_shadow = shadow_projection
            * sun
            * Mat4::from_translation(inputs.camera_position).inverse();

        let view_projection = inputs.camera.projection
            * inputs.camera.model_view
            * rotation_matrix;
        let reprojection = self.planner.plan(view_projection);

        let palette = self.resolver.palette();
        FrameData {
            model_view_matrix: inputs.camera.model_view.to_cols_array_2d(),
            inverse_model_view_matrix: inputs
                .camera
                .model_view
                .inverse()
                .to_cols_array_2d(),
            projection_matrix: inputs.camera.projection.to_cols_array_2d(),
            rotation_matrix: rotation_matrix.to_cols_array_2d(),
            inverse_rotation_matrix: inputs
                .camera
                .rotation
                .inverse()
                .to_cols_array_2d(),
            shadow_projection_matrix: shadow_projection.to_cols_array_2d(),
            sun_rotation_matrix: sun_rotation_matrix.to_cols_array_2d(),
            inverse_sun_rotation_matrix: sun_rotation_matrix
                .inverse()
                .to_cols_array_2d(),
            camera_to_shadow_projection_matrix: camera_to_shadow
                .to_cols_array_2d(),
            element_color: palette.element_table(),
            subunit_color: palette.subunit_table(),
            residue_color: palette.residue_table(),
            secondary_structure_color: palette.secondary_structure_table(),
            color_weights: weights.as_array(),
            atom_radii: palette.radii().0,
            has_shadows: u32::from(lighting.has_shadows),
            shadow_strength: lighting.shadow_strength.clamp(0.0, 1.0),
            has_depth_cueing: u32::from(lighting.has_depth_cueing),
            depth_cueing_strength: lighting
                .depth_cueing_strength
                .clamp(0.0, 1.0),
            depth_bias: depth_bias_for(inputs.near_plane, inputs.far_plane),
            _pad: [0.0; 3],
            reprojection,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::atom::{AtomElement, Residue, SecondaryStructure};
    use crate::grid::GridSizing;

    fn test_atoms(count: usize) -> Vec<AtomRecord> {
        (0..count)
            .map(|i| {
                AtomRecord::new(
                    Vec3::new(i as f32, (i % 7) as f32, (i % 3) as f32),
                    AtomElement::Carbon,
                    Residue::Ala,
                    0,
                    SecondaryStructure::Loop,
                )
            })
            .collect()
    }

    fn test_inputs(atoms: &[AtomRecord]) -> FrameInputs<'_> {
        FrameInputs {
            atoms,
            geometry_changed: false,
            camera: CameraMatrices {
                model_view: Mat4::from_translation(Vec3::new(
                    0.0, 0.0, 100.0,
                )),
                projection: Mat4::perspective_rh(
                    45.0f32.to_radians(),
                    1.6,
                    1.0,
                    1000.0,
                ),
                rotation: Mat4::IDENTITY,
            },
            camera_position: Vec3::new(0.0, 0.0, 100.0),
            near_plane: 1.0,
            far_plane: 101.0,
        }
    }

    #[test]
    fn test_frame_data_layout_is_stable() {
        // 9 matrices + 4 color tables + weights + radii + 5 scalars
        // + padding + the reprojection block.
        let expected = 9 * 64
            + (MAX_ELEMENT_COLORS
                + MAX_SUBUNIT_COLORS
                + MAX_RESIDUE_COLORS
                + MAX_SS_COLORS)
                * 16
            + ColorMode::COUNT * 4
            + ATOM_TYPE_COUNT * 4
            + 8 * 4
            + size_of::<ReprojectionData>();
        assert_eq!(size_of::<FrameData>(), expected);
    }

    #[test]
    fn test_assemble_populates_record() {
        let atoms = test_atoms(50);
        let mut assembler =
            FrameStateAssembler::new(Options::default(), 1280, 720);
        let record = assembler.assemble(&test_inputs(&atoms)).unwrap();

        assert_eq!(record.has_shadows, 1);
        assert_eq!(record.shadow_strength, 0.4);
        assert_eq!(record.has_depth_cueing, 0);
        assert!((record.depth_bias - 0.02).abs() < 1e-6);
        assert_eq!(
            record.element_color
                [AtomElement::Carbon.atomic_number() as usize],
            AtomElement::Carbon.default_color()
        );
        // Default mode is element coloring, settled.
        assert_eq!(record.color_weights, [1.0, 0.0, 0.0, 0.0]);
        // First frame reprojects as identity.
        assert_eq!(
            record.reprojection.reprojection_matrix,
            Mat4::IDENTITY.to_cols_array_2d()
        );
        assert_eq!(assembler.resolved_colors().len(), atoms.len());
    }

    #[test]
    fn test_first_frame_builds_grid() {
        let atoms = test_atoms(100);
        let mut assembler =
            FrameStateAssembler::new(Options::default(), 800, 600);
        assert_eq!(assembler.grid_generation(), 0);
        let _ = assembler.assemble(&test_inputs(&atoms)).unwrap();
        assert_eq!(assembler.grid_generation(), 1);
        assert_eq!(assembler.sdf_descriptor().number_of_atoms, 100);
    }

    #[test]
    fn test_unchanged_geometry_reuses_grid() {
        let atoms = test_atoms(100);
        let mut assembler =
            FrameStateAssembler::new(Options::default(), 800, 600);
        let _ = assembler.assemble(&test_inputs(&atoms)).unwrap();
        let _ = assembler.assemble(&test_inputs(&atoms)).unwrap();
        assert_eq!(assembler.grid_generation(), 1);
    }

    #[test]
    fn test_grid_failure_keeps_previous_grid() {
        let atoms = test_atoms(100);
        let mut assembler =
            FrameStateAssembler::new(Options::default(), 800, 600);
        let _ = assembler.assemble(&test_inputs(&atoms)).unwrap();

        assembler.options_mut().grid.cells_per_axis = Some(1_000_000);
        let mut inputs = test_inputs(&atoms);
        inputs.geometry_changed = true;
        assert!(matches!(
            assembler.assemble(&inputs),
            Err(MolframeError::GridBuild(_))
        ));
        // The prior grid and generation survive the failure.
        assert_eq!(assembler.grid_generation(), 1);
        assert_eq!(assembler.sdf_descriptor().number_of_atoms, 100);
    }

    #[test]
    fn test_mode_switch_crossfades_weights() {
        let atoms = test_atoms(10);
        let mut assembler =
            FrameStateAssembler::new(Options::default(), 800, 600);
        let _ = assembler.assemble(&test_inputs(&atoms)).unwrap();

        assembler.set_color_mode(ColorMode::Subunit);
        let record = assembler.assemble(&test_inputs(&atoms)).unwrap();
        let sum: f32 = record.color_weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_atoms_assembles() {
        let mut assembler =
            FrameStateAssembler::new(Options::default(), 800, 600);
        let record = assembler.assemble(&test_inputs(&[])).unwrap();
        assert_eq!(assembler.sdf_descriptor().number_of_atoms, 0);
        // Degenerate bounding sphere disables the shadow fit.
        assert_eq!(
            record.shadow_projection_matrix,
            Mat4::IDENTITY.to_cols_array_2d()
        );
    }

    #[test]
    fn test_custom_grid_sizing_flows_through() {
        let atoms = test_atoms(64);
        let mut options = Options::default();
        options.grid.cells_per_axis = Some(4);
        let mut assembler = FrameStateAssembler::new(options, 800, 600);
        let _ = assembler.assemble(&test_inputs(&atoms)).unwrap();
        assert_eq!(assembler.grid().resolution(), 4);
        assert!(matches!(
            assembler.options().grid.to_config().sizing,
            GridSizing::CellsPerAxis(4)
        ));
    }
}
