//! GPU capability interface and its wgpu implementation.
//!
//! [`backend`] defines the traits the renderer core is written against.
//! Everything else in this module is the wgpu adapter: device/surface
//! initialization, buffers, the compute kernel, and the blit onto the
//! swapchain.

/// Backend-neutral GPU traits.
pub mod backend;
/// Fullscreen copy of the kernel output onto the swapchain.
pub mod blit;
/// Growable GPU buffers with device limit checks.
pub mod dynamic_buffer;
/// Ray-tracing kernel loading and scheduling hints.
pub mod kernel;
/// Shared wgpu boilerplate helpers for pipelines and bind group layouts.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Kernel-writable output texture.
pub mod texture;
/// [`backend::GpuBackend`] over wgpu.
pub mod wgpu_backend;

pub use backend::{
    BufferUsage, FrameImage, GpuBackend, KernelBindings, KernelInfo,
    PresentationSurface,
};
