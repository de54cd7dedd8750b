//! Backend-neutral GPU capability interface.
//!
//! The renderer core (sample pool, scene, uniforms, frame sequencing) only
//! talks to these traits. [`crate::gpu::wgpu_backend`] is the wgpu
//! implementation; tests drive the core with in-memory fakes.

use crate::error::TraceError;
use crate::renderer::workgroup::{GridSize, KernelHints, WorkgroupSize};

/// How a buffer is exposed to the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Small per-frame parameter record (`var<uniform>`).
    Uniform,
    /// Read-only array (`var<storage, read>`).
    Storage,
}

/// Dimensions of an image handed out by a [`PresentationSurface`].
pub trait FrameImage {
    /// Width in pixels.
    fn width(&self) -> u32;
    /// Height in pixels.
    fn height(&self) -> u32;
}

/// Source of writable output images, one per refresh tick.
pub trait PresentationSurface {
    /// Image type handed to [`GpuBackend::submit_with_present`].
    type Image: FrameImage;

    /// Next drawable image, or `None` when the surface is not ready (for
    /// example mid-resize). `None` is a skip, never an error.
    fn acquire_next_image(&mut self) -> Option<Self::Image>;
}

/// Scheduling information a loaded kernel reports.
pub trait KernelInfo {
    /// Hints queried once at load time.
    fn hints(&self) -> KernelHints;

    /// Workgroup shape the kernel is dispatched with. Backends that bake the
    /// shape into the kernel at load time return that shape.
    fn workgroup(&self) -> WorkgroupSize {
        WorkgroupSize::from_hints(self.hints())
    }
}

/// Resources bound to the kernel for one dispatch.
///
/// Slot order is fixed; see [`crate::renderer::BindingSlot`].
pub struct KernelBindings<'a, B: GpuBackend + ?Sized> {
    /// Per-frame [`crate::camera::Uniforms`].
    pub uniforms: &'a B::Buffer,
    /// Sphere sequence, orbiter first.
    pub spheres: &'a B::Buffer,
    /// Uniform scalars in [0, 1).
    pub random_scalars: &'a B::Buffer,
    /// Points inside the unit ball.
    pub unit_sphere_points: &'a B::Buffer,
    /// Image the kernel writes one color per pixel into.
    pub output: &'a B::StorageImage,
}

/// Minimal set of GPU operations the frame dispatcher needs.
pub trait GpuBackend {
    /// Device buffer handle.
    type Buffer;
    /// Kernel-writable image.
    type StorageImage;
    /// Presentable image from the matching [`PresentationSurface`].
    type Image: FrameImage;
    /// Loaded compute kernel.
    type Kernel: KernelInfo;
    /// Encoded, not yet submitted work.
    type Commands;

    /// Allocate a buffer initialized with `contents`.
    ///
    /// # Errors
    ///
    /// [`TraceError::BufferAllocation`] when the device cannot provide it.
    fn allocate_buffer(
        &mut self,
        label: &str,
        usage: BufferUsage,
        contents: &[u8],
    ) -> Result<Self::Buffer, TraceError>;

    /// Overwrite a buffer's contents, growing it when `contents` is larger
    /// than its capacity.
    ///
    /// # Errors
    ///
    /// [`TraceError::BufferAllocation`] when growth fails.
    fn write_buffer(
        &mut self,
        buffer: &mut Self::Buffer,
        contents: &[u8],
    ) -> Result<(), TraceError>;

    /// Allocate a kernel-writable image.
    ///
    /// # Errors
    ///
    /// [`TraceError::BufferAllocation`] when the device cannot provide it.
    fn allocate_image(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
    ) -> Result<Self::StorageImage, TraceError>;

    /// Encode one dispatch covering `grid` threads in groups of `group`.
    /// The backend rounds the group count up so partial groups at the edges
    /// are still launched.
    ///
    /// # Errors
    ///
    /// Backend-specific encoding failures.
    fn dispatch(
        &mut self,
        kernel: &Self::Kernel,
        bindings: &KernelBindings<'_, Self>,
        grid: GridSize,
        group: WorkgroupSize,
    ) -> Result<Self::Commands, TraceError>;

    /// Submit `commands` and present `image` once they complete. Does not
    /// wait for the GPU.
    fn submit_with_present(
        &mut self,
        commands: Self::Commands,
        output: &Self::StorageImage,
        image: Self::Image,
    );
}
