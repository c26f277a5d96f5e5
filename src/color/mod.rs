//! Atom coloring: palettes, the multi-mode blend resolver, and crossfades.
//!
//! Colors live in growable classification-ID maps while the application
//! runs; the fixed-capacity tables the backend reads are serialized from
//! them at the frame-record boundary.

mod blend;
mod crossfade;
mod palette;

pub use blend::{
    ColorBlendResolver, ColorMode, ColorModeWeights, ResolvedAtomColor,
};
pub use crossfade::ColorCrossfade;
pub use palette::{
    AtomRadii, ColorPalette, ATOM_TYPE_COUNT, FALLBACK_COLOR,
    MAX_ELEMENT_COLORS, MAX_RESIDUE_COLORS, MAX_SS_COLORS,
    MAX_SUBUNIT_COLORS,
};
