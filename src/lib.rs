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
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Tests may unwrap and panic freely.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic, clippy::float_cmp))]

//! Real-time heightmap terrain rendering on wgpu with a free-fly camera.
//!
//! Relief loads an 8-bit heightmap, builds one of three terrain meshes and
//! flies a yaw/pitch camera over it:
//!
//! - **plane** - a flat subdivided quad (no heightmap needed)
//! - **strip** - the heightmap displaced on the CPU, drawn as one triangle
//!   strip per row
//! - **patch** - a coarse patch grid subdivided by instancing and displaced
//!   in the vertex shader by sampling the heightmap texture
//!
//! # Key entry points
//!
//! - [`camera::FlyCamera`] - the camera model (pure math, no GPU)
//! - [`mesh`] - the mesh generators (pure functions, no GPU)
//! - [`engine::TerrainEngine`] - GPU context, renderer, input and timing
//! - [`options::Options`] - TOML-backed configuration
//! - `Viewer` (feature `viewer`) - a winit window around the engine

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod mesh;
pub mod options;
pub mod renderer;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::TerrainEngine;
pub use error::ReliefError;
pub use input::{Command, InputEvent, KeyAction};
pub use options::{Options, TerrainMode};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
