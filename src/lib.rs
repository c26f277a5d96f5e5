// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! CPU-side per-frame rendering state for molecular visualization.
//!
//! Molframe computes the data contract a molecular rendering backend
//! consumes each frame: the flat per-frame uniform block with camera,
//! shadow, and coloring state, the blended atom color model with live
//! crossfades, a uniform spatial grid for SDF/occlusion atom queries, and
//! the temporal-reprojection record for jittered multi-frame accumulation.
//!
//! # Key entry points
//!
//! - [`frame::FrameStateAssembler`] - produces the per-frame
//!   [`frame::FrameData`] handed to the backend
//! - [`color::ColorBlendResolver`] - weighted multi-mode atom coloring
//! - [`grid::GridSlot`] - rebuild-and-swap spatial grid ownership
//! - [`reprojection::ReprojectionPlanner`] - jitter + reprojection matrices
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Architecture
//!
//! All components run synchronously on the frame-production thread. The
//! spatial grid is rebuilt off to the side and swapped in whole, so backend
//! readers holding an [`std::sync::Arc`] never observe a partial rebuild.
//! Everything the backend reads as raw bytes is `#[repr(C)]` +
//! [`bytemuck::Pod`], and field order inside those structs is fixed for
//! the lifetime of a rendering session.

pub mod atom;
pub mod color;
pub mod error;
pub mod frame;
pub mod grid;
pub mod options;
pub mod reprojection;
pub mod vertex;
