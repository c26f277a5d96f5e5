//! Weighted multi-mode color blending.

use rustc_hash::FxHashSet;

use crate::atom::AtomRecord;
use crate::color::palette::{ColorPalette, FALLBACK_COLOR};

/// Atom coloring scheme.
///
/// The blend is a weighted sum over all modes, so adding a mode means
/// adding a variant here and a lookup arm in the resolver; the blend
/// formula itself is mode-count-agnostic.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum ColorMode {
    /// Color by chemical element.
    Element = 0,
    /// Color by residue type.
    Residue = 1,
    /// Color by subunit (chain).
    Subunit = 2,
    /// Color by secondary structure.
    SecondaryStructure = 3,
}

impl ColorMode {
    /// Number of coloring modes.
    pub const COUNT: usize = 4;

    /// All modes, in weight-vector order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Element,
        Self::Residue,
        Self::Subunit,
        Self::SecondaryStructure,
    ];
}

/// Per-mode contributions to the final atom color.
///
/// Outside an active crossfade the weights are one-hot (a single mode at
/// 1.0); during a crossfade several modes are non-zero but the sum stays
/// 1.0. The resolver tolerates anything else by clamping and normalizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorModeWeights([f32; ColorMode::COUNT]);

impl ColorModeWeights {
    /// All weight on a single mode.
    #[must_use]
    pub fn exclusive(mode: ColorMode) -> Self {
        let mut weights = [0.0; ColorMode::COUNT];
        weights[mode as usize] = 1.0;
        Self(weights)
    }

    /// Weights from a raw per-mode array, in [`ColorMode::ALL`] order.
    #[must_use]
    pub fn from_array(weights: [f32; ColorMode::COUNT]) -> Self {
        Self(weights)
    }

    /// Weight of one mode.
    #[must_use]
    pub fn get(&self, mode: ColorMode) -> f32 {
        self.0[mode as usize]
    }

    /// Set the weight of one mode.
    pub fn set(&mut self, mode: ColorMode, weight: f32) {
        self.0[mode as usize] = weight;
    }

    /// Raw per-mode array, in [`ColorMode::ALL`] order.
    #[must_use]
    pub fn as_array(&self) -> [f32; ColorMode::COUNT] {
        self.0
    }

    /// Component-wise linear interpolation.
    #[must_use]
    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        let mut weights = [0.0; ColorMode::COUNT];
        for (i, w) in weights.iter_mut().enumerate() {
            *w = start.0[i] + (end.0[i] - start.0[i]) * t;
        }
        Self(weights)
    }

    /// Weights clamped to [0, 1] (non-finite values become 0) and scaled
    /// to sum to 1. An all-zero vector stays all-zero.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut weights = self.0;
        for w in &mut weights {
            *w = if w.is_finite() { w.clamp(0.0, 1.0) } else { 0.0 };
        }
        let sum: f32 = weights.iter().sum();
        if sum > 0.0 {
            for w in &mut weights {
                *w /= sum;
            }
        }
        Self(weights)
    }
}

impl Default for ColorModeWeights {
    fn default() -> Self {
        Self::exclusive(ColorMode::Element)
    }
}

/// Final per-atom RGBA color produced by the blend. Transient: recomputed
/// whenever weights or tables change, never persisted.
pub type ResolvedAtomColor = [f32; 4];

/// Resolves atom classifications and per-mode weights into final colors.
///
/// Classification IDs outside their table substitute [`FALLBACK_COLOR`];
/// each distinct offending ID is logged once to keep a malformed structure
/// from flooding the log at 60 resolutions per second.
#[derive(Debug, Default)]
pub struct ColorBlendResolver {
    palette: ColorPalette,
    warned: FxHashSet<(ColorMode, u32)>,
}

impl ColorBlendResolver {
    /// Resolver over the given palette.
    #[must_use]
    pub fn new(palette: ColorPalette) -> Self {
        Self {
            palette,
            warned: FxHashSet::default(),
        }
    }

    /// The underlying palette.
    #[must_use]
    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Mutable access for palette edits (color pickers, radii switches).
    pub fn palette_mut(&mut self) -> &mut ColorPalette {
        &mut self.palette
    }

    /// Displayed radius for an atom, from the palette's radii table.
    #[must_use]
    pub fn atom_radius(&self, atom: &AtomRecord) -> f32 {
        self.palette.radii().radius(atom.element)
    }

    /// Blend an atom's per-mode colors into its final color.
    ///
    /// `color = Σ_mode weight[mode] * table[mode][id[mode]]`, alpha
    /// included. Weights are clamped and normalized first, so transient
    /// animation states off the unit sum still blend plausibly. All-zero
    /// weights resolve to the fallback color.
    pub fn resolve(
        &mut self,
        atom: &AtomRecord,
        weights: ColorModeWeights,
    ) -> ResolvedAtomColor {
        let weights = weights.normalized();
        if weights.as_array().iter().sum::<f32>() == 0.0 {
            return FALLBACK_COLOR;
        }

        let mut color = [0.0; 4];
        for mode in ColorMode::ALL {
            let weight = weights.get(mode);
            if weight == 0.0 {
                continue;
            }
            let mode_color = self.mode_color(mode, atom);
            for (channel, value) in color.iter_mut().zip(mode_color) {
                *channel += weight * value;
            }
        }
        color
    }

    /// Resolve a whole atom set into `out`, reusing its allocation.
    pub fn resolve_all(
        &mut self,
        atoms: &[AtomRecord],
        weights: ColorModeWeights,
        out: &mut Vec<ResolvedAtomColor>,
    ) {
        out.clear();
        out.reserve(atoms.len());
        for atom in atoms {
            out.push(self.resolve(atom, weights));
        }
    }

    fn mode_color(&mut self, mode: ColorMode, atom: &AtomRecord) -> [f32; 4] {
        let (looked_up, id) = match mode {
            ColorMode::Element => (
                self.palette.element_color(atom.element),
                u32::from(atom.element),
            ),
            ColorMode::Residue => (
                self.palette.residue_color(atom.residue),
                u32::from(atom.residue),
            ),
            ColorMode::Subunit => (
                self.palette.subunit_color(atom.subunit),
                u32::from(atom.subunit),
            ),
            ColorMode::SecondaryStructure => (
                self.palette.secondary_structure_color(
                    atom.secondary_structure,
                ),
                u32::from(atom.secondary_structure),
            ),
        };
        looked_up.unwrap_or_else(|| {
            if self.warned.insert((mode, id)) {
                log::warn!(
                    "unclassified {mode:?} id {id}, using fallback color"
                );
            }
            FALLBACK_COLOR
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::atom::{AtomElement, Residue, SecondaryStructure};

    fn test_atom() -> AtomRecord {
        AtomRecord::new(
            Vec3::ZERO,
            AtomElement::Carbon,
            Residue::Ala,
            0,
            SecondaryStructure::Helix,
        )
    }

    /// Reference weighted sum, computed independently of the resolver.
    fn reference_blend(
        palette: &ColorPalette,
        atom: &AtomRecord,
        weights: [f32; 4],
    ) -> [f32; 4] {
        let tables = [
            palette.element_color(atom.element),
            palette.residue_color(atom.residue),
            palette.subunit_color(atom.subunit),
            palette.secondary_structure_color(atom.secondary_structure),
        ];
        let mut color = [0.0; 4];
        for (weight, table_color) in weights.iter().zip(tables) {
            let c = table_color.unwrap_or(FALLBACK_COLOR);
            for channel in 0..4 {
                color[channel] += weight * c[channel];
            }
        }
        color
    }

    #[test]
    fn test_blend_matches_reference_weighted_sum() {
        let mut resolver = ColorBlendResolver::default();
        let atom = test_atom();
        // Sweep a grid of weight vectors summing to 1.
        let steps = [0.0f32, 0.25, 0.5, 0.75, 1.0];
        for &a in &steps {
            for &b in &steps {
                for &c in &steps {
                    let d = 1.0 - a - b - c;
                    if d < 0.0 {
                        continue;
                    }
                    let weights = [a, b, c, d];
                    let resolved = resolver.resolve(
                        &atom,
                        ColorModeWeights::from_array(weights),
                    );
                    let expected =
                        reference_blend(resolver.palette(), &atom, weights);
                    for channel in 0..4 {
                        assert!(
                            (resolved[channel] - expected[channel]).abs()
                                < 1e-5,
                            "weights {weights:?} channel {channel}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_exclusive_weights_reproduce_tables() {
        let mut resolver = ColorBlendResolver::default();
        for element in AtomElement::ALL {
            let atom = AtomRecord::new(
                Vec3::ZERO,
                element,
                Residue::Gly,
                1,
                SecondaryStructure::Loop,
            );
            let color = resolver.resolve(
                &atom,
                ColorModeWeights::exclusive(ColorMode::Element),
            );
            assert_eq!(color, element.default_color());
        }
        for residue in Residue::ALL {
            let atom = AtomRecord::new(
                Vec3::ZERO,
                AtomElement::Carbon,
                residue,
                1,
                SecondaryStructure::Loop,
            );
            let color = resolver.resolve(
                &atom,
                ColorModeWeights::exclusive(ColorMode::Residue),
            );
            assert_eq!(color, residue.default_color());
        }
        for ss in SecondaryStructure::ALL {
            let atom = AtomRecord::new(
                Vec3::ZERO,
                AtomElement::Carbon,
                Residue::Gly,
                1,
                ss,
            );
            let color = resolver.resolve(
                &atom,
                ColorModeWeights::exclusive(ColorMode::SecondaryStructure),
            );
            assert_eq!(color, ss.default_color());
        }
    }

    #[test]
    fn test_half_element_half_subunit() {
        let mut resolver = ColorBlendResolver::default();
        let mut atom = test_atom();
        atom.subunit = 3;
        resolver
            .palette_mut()
            .set_element_color(AtomElement::Carbon, [1.0, 0.0, 0.0, 1.0]);
        resolver.palette_mut().set_subunit_color(3, [0.0, 1.0, 0.0, 1.0]);

        let mut weights = ColorModeWeights::from_array([0.0; 4]);
        weights.set(ColorMode::Element, 0.5);
        weights.set(ColorMode::Subunit, 0.5);

        let color = resolver.resolve(&atom, weights);
        assert_eq!(color, [0.5, 0.5, 0.0, 1.0]);
    }

    #[test]
    fn test_non_unit_weights_are_normalized() {
        let mut resolver = ColorBlendResolver::default();
        let atom = test_atom();
        let unit = resolver
            .resolve(&atom, ColorModeWeights::from_array([0.5, 0.5, 0.0, 0.0]));
        let doubled = resolver
            .resolve(&atom, ColorModeWeights::from_array([1.0, 1.0, 0.0, 0.0]));
        for channel in 0..4 {
            assert!((unit[channel] - doubled[channel]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_non_finite_weights_are_dropped() {
        let mut resolver = ColorBlendResolver::default();
        let atom = test_atom();
        let color = resolver.resolve(
            &atom,
            ColorModeWeights::from_array([f32::NAN, 0.0, 0.0, 1.0]),
        );
        let expected = resolver.resolve(
            &atom,
            ColorModeWeights::exclusive(ColorMode::SecondaryStructure),
        );
        assert_eq!(color, expected);
    }

    #[test]
    fn test_all_zero_weights_fall_back() {
        let mut resolver = ColorBlendResolver::default();
        let atom = test_atom();
        let color =
            resolver.resolve(&atom, ColorModeWeights::from_array([0.0; 4]));
        assert_eq!(color, FALLBACK_COLOR);
    }

    #[test]
    fn test_unclassified_id_uses_fallback() {
        let mut resolver = ColorBlendResolver::default();
        let mut atom = test_atom();
        atom.residue = 200;
        let color = resolver.resolve(
            &atom,
            ColorModeWeights::exclusive(ColorMode::Residue),
        );
        assert_eq!(color, FALLBACK_COLOR);
    }

    #[test]
    fn test_crossfade_continuity_at_boundaries() {
        // Colors at weight epsilon must approach the weight-zero result.
        let mut resolver = ColorBlendResolver::default();
        let atom = test_atom();
        let at_zero = resolver
            .resolve(&atom, ColorModeWeights::from_array([1.0, 0.0, 0.0, 0.0]));
        let near_zero = resolver.resolve(
            &atom,
            ColorModeWeights::from_array([1.0 - 1e-6, 1e-6, 0.0, 0.0]),
        );
        for channel in 0..4 {
            assert!((at_zero[channel] - near_zero[channel]).abs() < 1e-4);
        }
    }
}
