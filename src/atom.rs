//! Atom-level classification types and bounding volumes.
//!
//! Elements are keyed by atomic number so classification IDs index directly
//! into the fixed color/radius tables handed to the backend. Residue and
//! secondary-structure IDs follow the same scheme against their own tables.

use glam::Vec3;

/// Chemical element of an atom, keyed by atomic number.
///
/// Only elements commonly found in biomolecular structures are named;
/// everything else maps to [`AtomElement::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AtomElement {
    /// Unrecognized or unclassified element.
    Unknown = 0,
    /// Hydrogen (H).
    Hydrogen = 1,
    /// Carbon (C).
    Carbon = 6,
    /// Nitrogen (N).
    Nitrogen = 7,
    /// Oxygen (O).
    Oxygen = 8,
    /// Fluorine (F).
    Fluorine = 9,
    /// Sodium (Na).
    Sodium = 11,
    /// Phosphorus (P).
    Phosphorus = 15,
    /// Sulfur (S).
    Sulfur = 16,
    /// Chlorine (Cl).
    Chlorine = 17,
    /// Potassium (K).
    Potassium = 19,
    /// Calcium (Ca).
    Calcium = 20,
    /// Iron (Fe).
    Iron = 26,
    /// Zinc (Zn).
    Zinc = 30,
}

impl AtomElement {
    /// All named elements, in atomic-number order.
    pub const ALL: [Self; 14] = [
        Self::Unknown,
        Self::Hydrogen,
        Self::Carbon,
        Self::Nitrogen,
        Self::Oxygen,
        Self::Fluorine,
        Self::Sodium,
        Self::Phosphorus,
        Self::Sulfur,
        Self::Chlorine,
        Self::Potassium,
        Self::Calcium,
        Self::Iron,
        Self::Zinc,
    ];

    /// Element from an atomic number. Unmapped numbers yield `Unknown`.
    #[must_use]
    pub fn from_atomic_number(number: u8) -> Self {
        match number {
            1 => Self::Hydrogen,
            6 => Self::Carbon,
            7 => Self::Nitrogen,
            8 => Self::Oxygen,
            9 => Self::Fluorine,
            11 => Self::Sodium,
            15 => Self::Phosphorus,
            16 => Self::Sulfur,
            17 => Self::Chlorine,
            19 => Self::Potassium,
            20 => Self::Calcium,
            26 => Self::Iron,
            30 => Self::Zinc,
            _ => Self::Unknown,
        }
    }

    /// Element from a (case-insensitive) element symbol.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol.trim().to_uppercase().as_str() {
            "H" => Self::Hydrogen,
            "C" => Self::Carbon,
            "N" => Self::Nitrogen,
            "O" => Self::Oxygen,
            "F" => Self::Fluorine,
            "NA" => Self::Sodium,
            "P" => Self::Phosphorus,
            "S" => Self::Sulfur,
            "CL" => Self::Chlorine,
            "K" => Self::Potassium,
            "CA" => Self::Calcium,
            "FE" => Self::Iron,
            "ZN" => Self::Zinc,
            _ => Self::Unknown,
        }
    }

    /// Atomic number, used as the classification ID for table lookups.
    #[must_use]
    pub fn atomic_number(self) -> u8 {
        self as u8
    }

    /// Element symbol.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Unknown => "?",
            Self::Hydrogen => "H",
            Self::Carbon => "C",
            Self::Nitrogen => "N",
            Self::Oxygen => "O",
            Self::Fluorine => "F",
            Self::Sodium => "Na",
            Self::Phosphorus => "P",
            Self::Sulfur => "S",
            Self::Chlorine => "Cl",
            Self::Potassium => "K",
            Self::Calcium => "Ca",
            Self::Iron => "Fe",
            Self::Zinc => "Zn",
        }
    }

    /// Default display color (RGBA, 0-1 range).
    #[must_use]
    pub fn default_color(self) -> [f32; 4] {
        match self {
            Self::Hydrogen => [1.000, 1.000, 1.000, 1.0],
            Self::Carbon => [0.423, 0.733, 0.235, 1.0],
            Self::Nitrogen => [0.091, 0.148, 0.556, 1.0],
            Self::Oxygen => [1.000, 0.149, 0.000, 1.0],
            Self::Sulfur => [1.000, 0.780, 0.349, 1.0],
            _ => [0.517, 0.517, 0.517, 1.0],
        }
    }

    /// Van der Waals radius in Ångströms.
    #[must_use]
    pub fn van_der_waals_radius(self) -> f32 {
        match self {
            Self::Unknown => 1.0,
            Self::Hydrogen => 1.10,
            Self::Carbon => 1.50,
            Self::Nitrogen => 1.55,
            Self::Oxygen => 1.52,
            Self::Fluorine => 1.47,
            Self::Sodium => 2.27,
            Self::Phosphorus | Self::Sulfur => 1.80,
            Self::Chlorine => 1.75,
            Self::Potassium => 2.80,
            Self::Calcium => 2.31,
            Self::Iron => 1.94,
            Self::Zinc => 1.39,
        }
    }

    /// Covalent-scale radius in Ångströms, used for small-sphere display
    /// modes where van der Waals spheres would overlap.
    #[must_use]
    pub fn atomic_radius(self) -> f32 {
        match self {
            Self::Hydrogen => 0.25,
            Self::Carbon => 0.70,
            Self::Nitrogen => 0.65,
            Self::Oxygen => 0.60,
            Self::Sulfur => 1.00,
            _ => 0.50,
        }
    }
}

/// Amino acid residue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)] // variant names are the standard 3-letter codes
pub enum Residue {
    Arg,
    His,
    Lys,
    Asp,
    Glu,
    Ser,
    Thr,
    Asn,
    Gln,
    Cys,
    Sec,
    Gly,
    Pro,
    Ala,
    Val,
    Ile,
    Leu,
    Met,
    Phe,
    Tyr,
    Trp,
}

impl Residue {
    /// All residue types, in classification-ID order.
    pub const ALL: [Self; 21] = [
        Self::Arg,
        Self::His,
        Self::Lys,
        Self::Asp,
        Self::Glu,
        Self::Ser,
        Self::Thr,
        Self::Asn,
        Self::Gln,
        Self::Cys,
        Self::Sec,
        Self::Gly,
        Self::Pro,
        Self::Ala,
        Self::Val,
        Self::Ile,
        Self::Leu,
        Self::Met,
        Self::Phe,
        Self::Tyr,
        Self::Trp,
    ];

    /// Residue from its PDB 3-letter code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "ARG" => Some(Self::Arg),
            "HIS" => Some(Self::His),
            "LYS" => Some(Self::Lys),
            "ASP" => Some(Self::Asp),
            "GLU" => Some(Self::Glu),
            "SER" => Some(Self::Ser),
            "THR" => Some(Self::Thr),
            "ASN" => Some(Self::Asn),
            "GLN" => Some(Self::Gln),
            "CYS" => Some(Self::Cys),
            "SEC" => Some(Self::Sec),
            "GLY" => Some(Self::Gly),
            "PRO" => Some(Self::Pro),
            "ALA" => Some(Self::Ala),
            "VAL" => Some(Self::Val),
            "ILE" => Some(Self::Ile),
            "LEU" => Some(Self::Leu),
            "MET" => Some(Self::Met),
            "PHE" => Some(Self::Phe),
            "TYR" => Some(Self::Tyr),
            "TRP" => Some(Self::Trp),
            _ => None,
        }
    }

    /// Classification ID for table lookups.
    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Default display color (RGBA, 0-1 range), grouped by side-chain
    /// chemistry: basic, acidic, polar, and hydrophobic residues share a
    /// family hue with per-residue variation.
    #[must_use]
    pub fn default_color(self) -> [f32; 4] {
        match self {
            // Basic
            Self::Arg => [0.25, 0.41, 0.88, 1.0],
            Self::His => [0.33, 0.50, 0.85, 1.0],
            Self::Lys => [0.16, 0.35, 0.90, 1.0],
            // Acidic
            Self::Asp => [0.90, 0.22, 0.22, 1.0],
            Self::Glu => [0.85, 0.30, 0.22, 1.0],
            // Polar uncharged
            Self::Ser => [0.95, 0.60, 0.20, 1.0],
            Self::Thr => [0.92, 0.55, 0.25, 1.0],
            Self::Asn => [0.88, 0.65, 0.25, 1.0],
            Self::Gln => [0.85, 0.58, 0.30, 1.0],
            // Sulfur-containing
            Self::Cys | Self::Sec => [0.95, 0.80, 0.25, 1.0],
            Self::Met => [0.90, 0.75, 0.30, 1.0],
            // Small / special
            Self::Gly => [0.85, 0.85, 0.85, 1.0],
            Self::Pro => [0.60, 0.80, 0.55, 1.0],
            // Hydrophobic
            Self::Ala => [0.45, 0.65, 0.90, 1.0],
            Self::Val => [0.40, 0.60, 0.85, 1.0],
            Self::Ile => [0.35, 0.55, 0.85, 1.0],
            Self::Leu => [0.30, 0.55, 0.90, 1.0],
            // Aromatic
            Self::Phe => [0.55, 0.40, 0.80, 1.0],
            Self::Tyr => [0.60, 0.45, 0.75, 1.0],
            Self::Trp => [0.50, 0.35, 0.85, 1.0],
        }
    }
}

/// Secondary structure class for a residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SecondaryStructure {
    /// Alpha helix.
    Helix = 0,
    /// Beta sheet.
    Sheet = 1,
    /// Loop / coil.
    Loop = 2,
    /// Not part of a polymer chain (solvent, ligands).
    NonChain = 3,
}

impl SecondaryStructure {
    /// All classes, in classification-ID order.
    pub const ALL: [Self; 4] =
        [Self::Helix, Self::Sheet, Self::Loop, Self::NonChain];

    /// Classification ID for table lookups.
    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Default display color (RGBA, 0-1 range).
    #[must_use]
    pub fn default_color(self) -> [f32; 4] {
        match self {
            Self::Helix => [0.9, 0.3, 0.5, 1.0],
            Self::Sheet => [0.95, 0.85, 0.3, 1.0],
            Self::Loop => [0.6, 0.85, 0.6, 1.0],
            Self::NonChain => [0.55, 0.55, 0.55, 1.0],
        }
    }
}

/// Immutable per-atom data read by the rendering-state layer.
///
/// Owned by the scene/model layer. Classification fields are raw IDs, not
/// enum values: an ID may fall outside its color table (unclassified
/// residues, exotic elements) and the coloring layer substitutes a fallback
/// color for those rather than rejecting the atom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomRecord {
    /// World-space position in Ångströms.
    pub position: Vec3,
    /// Element classification ID (atomic number).
    pub element: u8,
    /// Residue-type classification ID.
    pub residue: u8,
    /// Subunit (chain) classification ID.
    pub subunit: u16,
    /// Secondary-structure classification ID.
    pub secondary_structure: u8,
}

impl AtomRecord {
    /// Atom with typed classifications.
    #[must_use]
    pub fn new(
        position: Vec3,
        element: AtomElement,
        residue: Residue,
        subunit: u16,
        secondary_structure: SecondaryStructure,
    ) -> Self {
        Self {
            position,
            element: element.atomic_number(),
            residue: residue.id(),
            subunit,
            secondary_structure: secondary_structure.id(),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl BoundingBox {
    /// Box center.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Per-axis extent.
    #[must_use]
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Minimal box containing all positions. `None` for an empty slice.
    #[must_use]
    pub fn from_positions(positions: &[Vec3]) -> Option<Self> {
        let first = positions.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &positions[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        Some(Self { min, max })
    }
}

/// Bounding sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Sphere center.
    pub center: Vec3,
    /// Sphere radius.
    pub radius: f32,
}

/// Bounding box and sphere of an atom cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    /// The bounding sphere of the object.
    pub sphere: BoundingSphere,
    /// The bounding box of the object.
    pub aabb: BoundingBox,
}

impl BoundingVolume {
    /// A volume with no extent, centered at the origin.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            sphere: BoundingSphere {
                center: Vec3::ZERO,
                radius: 0.0,
            },
            aabb: BoundingBox {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            },
        }
    }

    /// Bounding volume of a position cloud. The sphere is centered on the
    /// box center with the exact maximum distance to any position.
    #[must_use]
    pub fn from_positions(positions: &[Vec3]) -> Self {
        let Some(aabb) = BoundingBox::from_positions(positions) else {
            return Self::zero();
        };
        let center = aabb.center();
        let mut radius_sq = 0.0f32;
        for p in positions {
            radius_sq = radius_sq.max(p.distance_squared(center));
        }
        Self {
            sphere: BoundingSphere {
                center,
                radius: radius_sq.sqrt(),
            },
            aabb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_symbol_round_trip() {
        for element in AtomElement::ALL {
            if element == AtomElement::Unknown {
                continue;
            }
            assert_eq!(AtomElement::from_symbol(element.symbol()), element);
        }
    }

    #[test]
    fn test_element_atomic_number_round_trip() {
        assert_eq!(AtomElement::from_atomic_number(6), AtomElement::Carbon);
        assert_eq!(AtomElement::from_atomic_number(42), AtomElement::Unknown);
        assert_eq!(AtomElement::Carbon.atomic_number(), 6);
    }

    #[test]
    fn test_unknown_symbol_falls_back() {
        assert_eq!(AtomElement::from_symbol("Xx"), AtomElement::Unknown);
        assert_eq!(AtomElement::from_symbol(" c "), AtomElement::Carbon);
    }

    #[test]
    fn test_residue_code_parsing() {
        assert_eq!(Residue::from_code("ARG"), Some(Residue::Arg));
        assert_eq!(Residue::from_code("TRP"), Some(Residue::Trp));
        assert_eq!(Residue::from_code("XYZ"), None);
    }

    #[test]
    fn test_residue_ids_are_dense() {
        for (i, residue) in Residue::ALL.iter().enumerate() {
            assert_eq!(residue.id() as usize, i);
        }
    }

    #[test]
    fn test_bounding_volume_empty() {
        let volume = BoundingVolume::from_positions(&[]);
        assert_eq!(volume, BoundingVolume::zero());
    }

    #[test]
    fn test_bounding_volume_cube() {
        let positions = [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::ZERO,
        ];
        let volume = BoundingVolume::from_positions(&positions);
        assert_eq!(volume.aabb.center(), Vec3::ZERO);
        assert!((volume.sphere.radius - 3.0f32.sqrt()).abs() < 1e-6);
    }
}
