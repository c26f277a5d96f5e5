use serde::{Deserialize, Serialize};

/// Shadow and depth-cueing parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingOptions {
    /// Whether shadows should be cast between geometry elements.
    pub has_shadows: bool,
    /// Shadow darkening strength in [0, 1].
    pub shadow_strength: f32,
    /// Whether depth cueing should darken distant geometry.
    pub has_depth_cueing: bool,
    /// Depth cueing strength in [0, 1].
    pub depth_cueing_strength: f32,
    /// Sun azimuth angle in radians.
    pub sun_theta: f32,
    /// Sun elevation angle in radians.
    pub sun_phi: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            has_shadows: true,
            shadow_strength: 0.4,
            has_depth_cueing: false,
            depth_cueing_strength: 0.3,
            sun_theta: std::f32::consts::FRAC_PI_4,
            sun_phi: std::f32::consts::FRAC_PI_4,
        }
    }
}
