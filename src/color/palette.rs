//! Color and radius lookup tables.

use rand::Rng;
use rustc_hash::FxHashMap;

use crate::atom::{AtomElement, Residue, SecondaryStructure};

/// Maximum number of element colors in the frame record.
pub const MAX_ELEMENT_COLORS: usize = 128;
/// Maximum number of residue colors in the frame record.
pub const MAX_RESIDUE_COLORS: usize = 35;
/// Maximum number of subunit colors in the frame record.
pub const MAX_SUBUNIT_COLORS: usize = 512;
/// Maximum number of secondary-structure colors in the frame record.
pub const MAX_SS_COLORS: usize = 4;
/// Supported number of (different) atom types in the radii table.
pub const ATOM_TYPE_COUNT: usize = 64;

/// Color substituted for classification IDs outside their table's range.
pub const FALLBACK_COLOR: [f32; 4] = [0.517, 0.517, 0.517, 1.0];

/// Fixed subunit palette; subunits beyond its length get random colors.
const SUBUNIT_BASE_PALETTE: [[f32; 4]; 8] = [
    [0.000, 0.694, 0.894, 1.0],
    [0.780, 0.000, 0.612, 1.0],
    [0.761, 0.408, 0.004, 1.0],
    [0.106, 0.667, 0.000, 1.0],
    [0.917, 0.085, 0.183, 1.0],
    [0.225, 0.129, 0.650, 1.0],
    [0.894, 0.682, 0.203, 1.0],
    [0.216, 0.945, 0.657, 1.0],
];

/// Per-element-type displayed radii, indexed by atomic number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomRadii(pub [f32; ATOM_TYPE_COUNT]);

impl AtomRadii {
    /// Van der Waals radii for space-filling display.
    #[must_use]
    pub fn van_der_waals() -> Self {
        let mut radii = [AtomElement::Unknown.van_der_waals_radius();
            ATOM_TYPE_COUNT];
        for (i, radius) in radii.iter_mut().enumerate() {
            *radius = AtomElement::from_atomic_number(i as u8)
                .van_der_waals_radius();
        }
        Self(radii)
    }

    /// Covalent-scale radii for ball-and-stick display.
    #[must_use]
    pub fn atomic() -> Self {
        let mut radii =
            [AtomElement::Unknown.atomic_radius(); ATOM_TYPE_COUNT];
        for (i, radius) in radii.iter_mut().enumerate() {
            *radius = AtomElement::from_atomic_number(i as u8).atomic_radius();
        }
        Self(radii)
    }

    /// Uniform radius for every element type.
    #[must_use]
    pub fn fixed(radius: f32) -> Self {
        Self([radius; ATOM_TYPE_COUNT])
    }

    /// Radius for an element classification ID. Out-of-table IDs get the
    /// `Unknown` element's radius.
    #[must_use]
    pub fn radius(&self, element_id: u8) -> f32 {
        self.0
            .get(element_id as usize)
            .copied()
            .unwrap_or_else(|| AtomElement::Unknown.van_der_waals_radius())
    }
}

impl Default for AtomRadii {
    fn default() -> Self {
        Self::van_der_waals()
    }
}

/// Classification-ID → color tables for every coloring mode, plus the
/// per-element radii table.
///
/// Internally growable maps; [`ColorPalette::element_table`] and friends
/// serialize them into the fixed-capacity arrays the backend reads.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    element_colors: FxHashMap<u8, [f32; 4]>,
    residue_colors: FxHashMap<u8, [f32; 4]>,
    subunit_colors: Vec<[f32; 4]>,
    ss_colors: [[f32; 4]; MAX_SS_COLORS],
    radii: AtomRadii,
}

impl Default for ColorPalette {
    fn default() -> Self {
        let mut element_colors = FxHashMap::default();
        for element in AtomElement::ALL {
            let _ = element_colors
                .insert(element.atomic_number(), element.default_color());
        }

        let mut residue_colors = FxHashMap::default();
        for residue in Residue::ALL {
            let _ = residue_colors.insert(residue.id(), residue.default_color());
        }

        // Preselected palette first; the rest of the capacity is filled
        // with random colors so large multimeric structures stay distinct.
        let mut rng = rand::rng();
        let mut subunit_colors = SUBUNIT_BASE_PALETTE.to_vec();
        while subunit_colors.len() < MAX_SUBUNIT_COLORS {
            subunit_colors.push([
                rng.random_range(0.0..1.0),
                rng.random_range(0.0..1.0),
                rng.random_range(0.0..1.0),
                1.0,
            ]);
        }

        let mut ss_colors = [FALLBACK_COLOR; MAX_SS_COLORS];
        for ss in SecondaryStructure::ALL {
            ss_colors[ss.id() as usize] = ss.default_color();
        }

        Self {
            element_colors,
            residue_colors,
            subunit_colors,
            ss_colors,
            radii: AtomRadii::default(),
        }
    }
}

impl ColorPalette {
    /// Color for an element classification ID, if classified.
    #[must_use]
    pub fn element_color(&self, id: u8) -> Option<[f32; 4]> {
        self.element_colors.get(&id).copied()
    }

    /// Color for a residue classification ID, if classified.
    #[must_use]
    pub fn residue_color(&self, id: u8) -> Option<[f32; 4]> {
        self.residue_colors.get(&id).copied()
    }

    /// Color for a subunit classification ID, if in range.
    #[must_use]
    pub fn subunit_color(&self, id: u16) -> Option<[f32; 4]> {
        self.subunit_colors.get(id as usize).copied()
    }

    /// Color for a secondary-structure classification ID, if in range.
    #[must_use]
    pub fn secondary_structure_color(&self, id: u8) -> Option<[f32; 4]> {
        self.ss_colors.get(id as usize).copied()
    }

    /// Override the color of one element.
    pub fn set_element_color(&mut self, element: AtomElement, color: [f32; 4]) {
        let _ = self.element_colors.insert(element.atomic_number(), color);
    }

    /// Override the color of one residue type.
    pub fn set_residue_color(&mut self, residue: Residue, color: [f32; 4]) {
        let _ = self.residue_colors.insert(residue.id(), color);
    }

    /// Override the color of one subunit. IDs at or beyond
    /// [`MAX_SUBUNIT_COLORS`] are ignored.
    pub fn set_subunit_color(&mut self, id: u16, color: [f32; 4]) {
        let index = id as usize;
        if index >= MAX_SUBUNIT_COLORS {
            return;
        }
        if index >= self.subunit_colors.len() {
            self.subunit_colors.resize(index + 1, FALLBACK_COLOR);
        }
        self.subunit_colors[index] = color;
    }

    /// Override the color of one secondary-structure class.
    pub fn set_secondary_structure_color(
        &mut self,
        ss: SecondaryStructure,
        color: [f32; 4],
    ) {
        self.ss_colors[ss.id() as usize] = color;
    }

    /// The per-element radii table.
    #[must_use]
    pub fn radii(&self) -> &AtomRadii {
        &self.radii
    }

    /// Replace the radii table (e.g. switching display modes).
    pub fn set_radii(&mut self, radii: AtomRadii) {
        self.radii = radii;
    }

    /// Element table serialized at fixed capacity, indexed by atomic
    /// number. Unclassified slots hold the fallback color.
    #[must_use]
    pub fn element_table(&self) -> [[f32; 4]; MAX_ELEMENT_COLORS] {
        let mut table = [FALLBACK_COLOR; MAX_ELEMENT_COLORS];
        for (&id, &color) in &self.element_colors {
            if let Some(slot) = table.get_mut(id as usize) {
                *slot = color;
            }
        }
        table
    }

    /// Residue table serialized at fixed capacity.
    #[must_use]
    pub fn residue_table(&self) -> [[f32; 4]; MAX_RESIDUE_COLORS] {
        let mut table = [FALLBACK_COLOR; MAX_RESIDUE_COLORS];
        for (&id, &color) in &self.residue_colors {
            if let Some(slot) = table.get_mut(id as usize) {
                *slot = color;
            }
        }
        table
    }

    /// Subunit table serialized at fixed capacity.
    #[must_use]
    pub fn subunit_table(&self) -> [[f32; 4]; MAX_SUBUNIT_COLORS] {
        let mut table = [FALLBACK_COLOR; MAX_SUBUNIT_COLORS];
        for (slot, color) in table.iter_mut().zip(&self.subunit_colors) {
            *slot = *color;
        }
        table
    }

    /// Secondary-structure table serialized at fixed capacity.
    #[must_use]
    pub fn secondary_structure_table(&self) -> [[f32; 4]; MAX_SS_COLORS] {
        self.ss_colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_covers_named_classifications() {
        let palette = ColorPalette::default();
        for element in AtomElement::ALL {
            assert!(palette.element_color(element.atomic_number()).is_some());
        }
        for residue in Residue::ALL {
            assert!(palette.residue_color(residue.id()).is_some());
        }
        for ss in SecondaryStructure::ALL {
            assert!(palette.secondary_structure_color(ss.id()).is_some());
        }
    }

    #[test]
    fn test_subunit_palette_filled_to_capacity() {
        let palette = ColorPalette::default();
        assert!(palette.subunit_color(0).is_some());
        assert!(palette
            .subunit_color((MAX_SUBUNIT_COLORS - 1) as u16)
            .is_some());
        assert!(palette.subunit_color(MAX_SUBUNIT_COLORS as u16).is_none());
    }

    #[test]
    fn test_out_of_range_lookups_are_none() {
        let palette = ColorPalette::default();
        assert!(palette.residue_color(Residue::ALL.len() as u8).is_none());
        assert!(palette
            .secondary_structure_color(MAX_SS_COLORS as u8)
            .is_none());
    }

    #[test]
    fn test_element_table_matches_map() {
        let palette = ColorPalette::default();
        let table = palette.element_table();
        assert_eq!(
            table[AtomElement::Carbon.atomic_number() as usize],
            AtomElement::Carbon.default_color()
        );
        // Unclassified atomic numbers serialize as fallback.
        assert_eq!(table[42], FALLBACK_COLOR);
    }

    #[test]
    fn test_van_der_waals_radii_table() {
        let radii = AtomRadii::van_der_waals();
        assert_eq!(radii.radius(6), 1.50);
        assert_eq!(radii.radius(1), 1.10);
        // Out-of-table IDs fall back to the unknown-element radius.
        assert_eq!(radii.radius(200), 1.0);
    }

    #[test]
    fn test_fixed_radii() {
        let radii = AtomRadii::fixed(0.4);
        assert_eq!(radii.radius(6), 0.4);
        assert_eq!(radii.radius(16), 0.4);
    }
}
