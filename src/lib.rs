//! GPU-resident real-time ray tracer built on wgpu.
//!
//! Orbitrace traces a small scene of spheres (one orbiting sphere plus a
//! static background) with a compute kernel, one frame per display refresh.
//! Randomness comes from a pool of uniform scalars and unit-ball points
//! generated once on the CPU and uploaded before the first frame.
//!
//! # Key entry points
//!
//! - [`renderer::Renderer`] - frame dispatcher; one
//!   [`render_frame`](renderer::Renderer::render_frame) call per tick
//! - [`scene::SceneState`] - orbit animation, a pure function of frame index
//! - [`camera::UniformBuilder`] - per-frame kernel uniforms
//! - [`sampling::SamplePool`] - stochastic sample pool
//! - [`options::Options`] - TOML configuration
//!
//! # Architecture
//!
//! The renderer core is written against the traits in [`gpu::backend`]:
//! a [`gpu::GpuBackend`] allocates buffers and encodes dispatches, and a
//! [`gpu::PresentationSurface`] hands out drawable images. The wgpu
//! implementation lives in [`gpu::wgpu_backend`] and
//! [`gpu::render_context`]. Because swapchain images are rarely
//! storage-capable, the kernel writes an intermediate storage texture that is
//! blitted onto the swapchain image in the same submission.

pub mod camera;
pub mod error;
pub mod gpu;
pub mod options;
pub mod renderer;
pub mod sampling;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use error::TraceError;
pub use options::Options;
pub use renderer::{FrameOutcome, Renderer, SkipReason};
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
