//! Eased crossfades between coloring modes.
//!
//! Switching the coloring scheme interpolates the per-mode weight vector
//! from the outgoing to the incoming mode over a short duration with
//! ease-out, so the blended color never jumps. Re-targeting mid-flight
//! starts the new fade from the current mid-lerp weights (smooth
//! preemption).

use web_time::Instant;

use crate::color::blend::{ColorMode, ColorModeWeights};

/// Default crossfade duration in seconds.
const DEFAULT_DURATION: f32 = 0.3;

/// Cubic-hermite ease-out, c1=0.33 c2=1.0 for a natural deceleration.
fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let omt = 1.0 - t;
    0.33 * 3.0 * t * omt * omt + 3.0 * omt * t * t + t * t * t
}

/// Animates [`ColorModeWeights`] between exclusive coloring modes.
#[derive(Debug)]
pub struct ColorCrossfade {
    current: ColorModeWeights,
    start: ColorModeWeights,
    target: ColorModeWeights,
    /// When the active fade started (None = settled).
    started: Option<Instant>,
    duration: f32,
}

impl ColorCrossfade {
    /// Crossfade settled on the given mode.
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        let weights = ColorModeWeights::exclusive(mode);
        Self {
            current: weights,
            start: weights,
            target: weights,
            started: None,
            duration: DEFAULT_DURATION,
        }
    }

    /// Set the fade duration in seconds (clamped to be non-negative).
    pub fn set_duration(&mut self, seconds: f32) {
        self.duration = seconds.max(0.0);
    }

    /// Begin fading toward an exclusive mode.
    pub fn fade_to(&mut self, mode: ColorMode) {
        self.fade_to_weights(ColorModeWeights::exclusive(mode));
    }

    /// Begin fading toward an arbitrary weight vector.
    pub fn fade_to_weights(&mut self, target: ColorModeWeights) {
        if target == self.current {
            self.target = target;
            self.started = None;
            return;
        }
        self.start = self.current;
        self.target = target;
        self.started = Some(Instant::now());
    }

    /// Snap to a weight vector immediately (no fade).
    pub fn set_weights_immediate(&mut self, weights: ColorModeWeights) {
        self.current = weights;
        self.start = weights;
        self.target = weights;
        self.started = None;
    }

    /// Advance the fade for the current frame.
    ///
    /// Returns `true` while still fading (caller should keep redrawing).
    pub fn update(&mut self) -> bool {
        let Some(started) = self.started else {
            return false;
        };

        let elapsed = started.elapsed().as_secs_f32();
        let raw_t = if self.duration > 0.0 {
            (elapsed / self.duration).min(1.0)
        } else {
            1.0
        };
        self.current =
            ColorModeWeights::lerp(self.start, self.target, ease_out(raw_t));

        if raw_t >= 1.0 {
            self.current = self.target;
            self.started = None;
            return false;
        }
        true
    }

    /// The weight vector for the current frame.
    #[must_use]
    pub fn weights(&self) -> ColorModeWeights {
        self.current
    }

    /// Whether a fade is in flight.
    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.started.is_some()
    }
}

impl Default for ColorCrossfade {
    fn default() -> Self {
        Self::new(ColorMode::Element)
    }
}
