//! Procedural geometry vertex formats consumed by the backend.
//!
//! These structs are written verbatim into vertex/instance buffers; field
//! order and layout must not change within a rendering session.

use glam::Vec3;

/// Generic mesh vertex: world-space position and surface normal.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position of the vertex in world space.
    pub position: [f32; 3],
    /// Normal of the surface tangent to the vertex in world space.
    pub normal: [f32; 3],
}

/// Billboard vertex for impostor-sphere atoms.
///
/// Four of these per atom; the fragment stage ray-marches the sphere from
/// the billboard mapping and the atom center/radius.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BillboardVertex {
    /// Corner position in world space.
    pub position: [f32; 3],
    /// Center of the atom the billboard represents, world space.
    pub atom_center: [f32; 3],
    /// 2-D billboard mapping in [-1, 1]².
    pub billboard_mapping: [f32; 2],
    /// Displayed atom radius.
    pub atom_radius: f32,
}

/// Bond cylinder primitive between two atoms.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BondPrimitive {
    /// Position of the first atom in world space.
    pub atom_a: [f32; 3],
    /// Position of the second atom in world space.
    pub atom_b: [f32; 3],
    /// Cylinder center in world space.
    pub cylinder_center: [f32; 3],
    /// Bond radius.
    pub bond_radius: f32,
}

impl BondPrimitive {
    /// Bond between two atom positions, centered at their midpoint.
    #[must_use]
    pub fn between(atom_a: Vec3, atom_b: Vec3, bond_radius: f32) -> Self {
        Self {
            atom_a: atom_a.to_array(),
            atom_b: atom_b.to_array(),
            cylinder_center: ((atom_a + atom_b) * 0.5).to_array(),
            bond_radius,
        }
    }
}

/// Debug point vertex (position only).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugPoint {
    /// Position of the point in world space.
    pub position: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bond_center_is_midpoint() {
        let bond = BondPrimitive::between(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 4.0, 6.0),
            0.25,
        );
        assert_eq!(bond.cylinder_center, [1.0, 2.0, 3.0]);
        assert_eq!(bond.bond_radius, 0.25);
    }

    #[test]
    fn test_layouts_are_tightly_packed() {
        assert_eq!(size_of::<MeshVertex>(), 24);
        assert_eq!(size_of::<BillboardVertex>(), 36);
        assert_eq!(size_of::<BondPrimitive>(), 40);
        assert_eq!(size_of::<DebugPoint>(), 12);
    }
}
