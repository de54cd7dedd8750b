//! Fixed pinhole camera and per-frame kernel uniforms.
//!
//! The camera sits at the origin looking down +Z. Each frame the view plane
//! is re-derived from the output image's dimensions, since those can change
//! between frames.

/// Camera parameters, the GPU uniform record, and the builder between them.
pub mod core;

pub use self::core::{Camera, UniformBuilder, Uniforms};
