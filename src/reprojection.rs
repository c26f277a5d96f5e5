//! Temporal reprojection and sub-pixel jitter planning.
//!
//! Each frame the projection is offset by a small sub-pixel jitter drawn
//! from a fixed-length low-discrepancy sequence, and a reprojection matrix
//! maps the current frame's NDC into the previous frame's NDC so the
//! accumulation pass can fetch history samples under camera motion.

use glam::{Mat4, Vec2, Vec3};

/// Default number of jitter samples before the sequence wraps.
pub const DEFAULT_SEQUENCE_LENGTH: u32 = 16;

/// Radical-inverse Halton sample in [0, 1).
fn halton(index: u32, base: u32) -> f32 {
    let mut i = index + 1; // start at 1
    let mut f = 1.0f64;
    let mut r = 0.0f64;
    let b = f64::from(base);
    while i > 0 {
        f /= b;
        r += f * f64::from(i % base);
        i /= base;
    }
    r as f32
}

/// Centered Halton(2, 3) jitter in [-0.5, 0.5) pixels.
fn jitter_sample(index: u32) -> Vec2 {
    Vec2::new(halton(index, 2) - 0.5, halton(index, 3) - 0.5)
}

/// Reprojection record read by the backend as a raw uniform block.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ReprojectionData {
    /// Reprojects from the current frame's NDC to the previous frame's NDC.
    pub reprojection_matrix: [[f32; 4]; 4],
    /// Render target width in pixels.
    pub render_target_width: f32,
    /// Render target height in pixels.
    pub render_target_height: f32,
    /// Current frame's jitter in pixels.
    pub pixel_jitter: [f32; 2],
    /// Previous frame's jitter in pixels.
    pub previous_pixel_jitter: [f32; 2],
    /// Current frame's jitter in texture space.
    pub texel_jitter: [f32; 2],
    /// Previous frame's jitter in texture space.
    pub previous_texel_jitter: [f32; 2],
    /// Padding for 16-byte block alignment.
    pub _pad: [f32; 2],
}

/// Plans the per-frame jitter offset and reprojection matrix.
///
/// State spans the rendering session: the previous view-projection matrix,
/// the jitter sequence index, and the last emitted offsets. One
/// [`ReprojectionPlanner::plan`] call per displayed frame.
#[derive(Debug)]
pub struct ReprojectionPlanner {
    sequence_length: u32,
    jitter_index: u32,
    width: u32,
    height: u32,
    previous_view_projection: Option<Mat4>,
    pixel_jitter: Vec2,
    previous_pixel_jitter: Vec2,
    texel_jitter: Vec2,
    previous_texel_jitter: Vec2,
}

impl ReprojectionPlanner {
    /// Planner for a render target of the given pixel dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            jitter_index: 0,
            width: width.max(1),
            height: height.max(1),
            previous_view_projection: None,
            pixel_jitter: Vec2::ZERO,
            previous_pixel_jitter: Vec2::ZERO,
            texel_jitter: Vec2::ZERO,
            previous_texel_jitter: Vec2::ZERO,
        }
    }

    /// Override the jitter sequence length (clamped to at least 1).
    #[must_use]
    pub fn with_sequence_length(mut self, length: u32) -> Self {
        self.sequence_length = length.max(1);
        self.jitter_index %= self.sequence_length;
        self
    }

    /// Notify the planner of a render-target resize.
    ///
    /// Must be called before the next [`ReprojectionPlanner::plan`]; the
    /// jitter index is preserved but pixel-to-NDC conversion switches to
    /// the new dimensions immediately. Skipping this call misaligns the
    /// accumulated history (visually wrong, never fatal) until the next
    /// notification arrives.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    /// Drop accumulated history; the next frame reprojects as identity.
    ///
    /// Use when the scene is replaced outright and history samples are
    /// meaningless.
    pub fn reset_history(&mut self) {
        self.previous_view_projection = None;
    }

    /// Produce the reprojection record for the current frame.
    ///
    /// Emits the jitter offset for the current sequence index (advancing
    /// it with wraparound), converts it to texture space at the current
    /// render-target dimensions, and computes
    /// `previous_view_projection * inverse(current_view_projection)`.
    /// The first frame after construction or
    /// [`ReprojectionPlanner::reset_history`] yields the identity matrix,
    /// since there is no prior image to reproject from.
    pub fn plan(&mut self, view_projection: Mat4) -> ReprojectionData {
        self.previous_pixel_jitter = self.pixel_jitter;
        self.previous_texel_jitter = self.texel_jitter;

        self.pixel_jitter = jitter_sample(self.jitter_index);
        self.texel_jitter = self.pixel_jitter
            / Vec2::new(self.width as f32, self.height as f32);
        self.jitter_index = (self.jitter_index + 1) % self.sequence_length;

        let reprojection_matrix = self
            .previous_view_projection
            .map_or(Mat4::IDENTITY, |previous| {
                previous * view_projection.inverse()
            });
        self.previous_view_projection = Some(view_projection);

        ReprojectionData {
            reprojection_matrix: reprojection_matrix.to_cols_array_2d(),
            render_target_width: self.width as f32,
            render_target_height: self.height as f32,
            pixel_jitter: self.pixel_jitter.to_array(),
            previous_pixel_jitter: self.previous_pixel_jitter.to_array(),
            texel_jitter: self.texel_jitter.to_array(),
            previous_texel_jitter: self.previous_texel_jitter.to_array(),
            _pad: [0.0; 2],
        }
    }

    /// Jitter of the most recent frame, in pixels.
    #[must_use]
    pub fn pixel_jitter(&self) -> Vec2 {
        self.pixel_jitter
    }

    /// Jitter of the most recent frame, in NDC units.
    #[must_use]
    pub fn ndc_jitter(&self) -> Vec2 {
        self.pixel_jitter
            * Vec2::new(2.0 / self.width as f32, -2.0 / self.height as f32)
    }

    /// Apply the most recent jitter to a projection matrix.
    #[must_use]
    pub fn jittered_projection(&self, projection: Mat4) -> Mat4 {
        let jitter = self.ndc_jitter();
        Mat4::from_translation(Vec3::new(jitter.x, jitter.y, 0.0))
            * projection
    }

    /// Current index into the jitter sequence.
    #[must_use]
    pub fn jitter_index(&self) -> u32 {
        self.jitter_index
    }

    /// Configured jitter sequence length.
    #[must_use]
    pub fn sequence_length(&self) -> u32 {
        self.sequence_length
    }
}
