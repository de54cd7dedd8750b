//! Shared utilities for the viewer loop.

/// Frame pacing and frame-rate smoothing.
pub mod frame_timing;
