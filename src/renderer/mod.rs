//! Frame dispatcher.
//!
//! One call to [`Renderer::render_frame`] per refresh tick runs the whole
//! cycle: acquire an image, build the frame's scene and uniforms, upload
//! them, dispatch the ray-tracing kernel over every pixel, and submit with
//! present-on-completion. The CPU never waits for the GPU.

pub mod workgroup;

use crate::camera::{Camera, UniformBuilder};
use crate::error::TraceError;
use crate::gpu::backend::{
    BufferUsage, FrameImage, GpuBackend, KernelBindings, KernelInfo,
    PresentationSurface,
};
use crate::options::Options;
use crate::sampling::SamplePool;
use crate::scene::SceneState;
use self::workgroup::{GridSize, WorkgroupSize};

/// Kernel binding indices. The kernel addresses resources by position, so
/// these never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingSlot {
    /// [`crate::camera::Uniforms`] record.
    Uniforms,
    /// Sphere sequence.
    Spheres,
    /// Uniform scalar samples.
    RandomScalars,
    /// Unit-ball samples.
    UnitSpherePoints,
    /// Output image.
    Output,
}

impl BindingSlot {
    /// Every slot in binding order.
    pub const ALL: [Self; 5] = [
        Self::Uniforms,
        Self::Spheres,
        Self::RandomScalars,
        Self::UnitSpherePoints,
        Self::Output,
    ];

    /// `@binding` index in `@group(0)`.
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            Self::Uniforms => 0,
            Self::Spheres => 1,
            Self::RandomScalars => 2,
            Self::UnitSpherePoints => 3,
            Self::Output => 4,
        }
    }
}

/// Why a tick produced no frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The surface had no image ready.
    NoImage,
    /// The acquired image had a zero dimension.
    ZeroExtent {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },
}

/// Result of one refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Work was submitted for the given frame index.
    Presented {
        /// Frame index the scene and uniforms were built from.
        frame_index: u32,
    },
    /// Nothing was submitted and the frame counter did not move.
    Skipped(SkipReason),
}

/// Kernel output image together with the size it was allocated for.
struct OutputImage<I> {
    image: I,
    width: u32,
    height: u32,
}

/// Renderer context: owns every piece of cross-frame state.
pub struct Renderer<B: GpuBackend> {
    kernel: B::Kernel,
    workgroup: WorkgroupSize,
    samples: SamplePool<B::Buffer>,
    scene: SceneState,
    uniforms: UniformBuilder,
    frame_index: u32,
    uniform_buffer: B::Buffer,
    sphere_buffer: B::Buffer,
    output: Option<OutputImage<B::StorageImage>>,
}

impl<B: GpuBackend> Renderer<B> {
    /// Build the sample pool and per-frame buffers for `kernel`.
    ///
    /// # Errors
    ///
    /// Any allocation or sampling failure; there is no degraded mode.
    pub fn new(
        backend: &mut B,
        kernel: B::Kernel,
        options: &Options,
    ) -> Result<Self, TraceError> {
        let samples = SamplePool::initialize(backend, &options.sampling)?;
        Self::with_samples(backend, kernel, samples, options)
    }

    /// Like [`Renderer::new`] with a pre-built sample pool.
    ///
    /// # Errors
    ///
    /// Allocation failure of the uniform or sphere buffer.
    pub fn with_samples(
        backend: &mut B,
        kernel: B::Kernel,
        samples: SamplePool<B::Buffer>,
        options: &Options,
    ) -> Result<Self, TraceError> {
        let scene = SceneState::new(&options.scene);
        let uniforms = UniformBuilder::new(Camera::new(&options.camera));
        let workgroup = kernel.workgroup();

        let initial = scene.advance(0);
        let uniform_buffer = backend.allocate_buffer(
            "Frame Uniforms",
            BufferUsage::Uniform,
            &[0u8; size_of::<crate::camera::Uniforms>()],
        )?;
        let sphere_buffer = backend.allocate_buffer(
            "Spheres",
            BufferUsage::Storage,
            bytemuck::cast_slice(&initial.to_gpu()),
        )?;

        log::info!(
            "renderer ready: {} spheres orbiting {} at radius {}, {} samples, \
             fov {:.1} deg, workgroup {}x{}x{}",
            scene.sphere_count(),
            scene.orbit_center(),
            scene.orbit_radius(),
            samples.len(),
            uniforms.camera().fovy_degrees(),
            workgroup.width,
            workgroup.height,
            workgroup.depth,
        );

        Ok(Self {
            kernel,
            workgroup,
            samples,
            scene,
            uniforms,
            frame_index: 0,
            uniform_buffer,
            sphere_buffer,
            output: None,
        })
    }

    /// Index the next presented frame will be built from.
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Workgroup shape used for every dispatch.
    pub fn workgroup(&self) -> WorkgroupSize {
        self.workgroup
    }

    /// The scene animation.
    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    /// The sample pool.
    pub fn samples(&self) -> &SamplePool<B::Buffer> {
        &self.samples
    }

    /// Run one refresh tick.
    ///
    /// Skips (without touching the frame counter or submitting anything) when
    /// the surface has no image or the image has a zero dimension.
    ///
    /// # Errors
    ///
    /// Buffer or image allocation failures while uploading frame data.
    pub fn render_frame<S>(
        &mut self,
        backend: &mut B,
        surface: &mut S,
    ) -> Result<FrameOutcome, TraceError>
    where
        S: PresentationSurface<Image = B::Image>,
    {
        // Acquire
        let Some(image) = surface.acquire_next_image() else {
            log::debug!("frame {} skipped: no image", self.frame_index);
            return Ok(FrameOutcome::Skipped(SkipReason::NoImage));
        };
        let (width, height) = (image.width(), image.height());

        // Build
        let scene = self.scene.advance(self.frame_index);
        let Some(uniforms) = self.uniforms.build(&scene, width, height) else {
            log::debug!(
                "frame {} skipped: {width}x{height} image",
                self.frame_index
            );
            return Ok(FrameOutcome::Skipped(SkipReason::ZeroExtent {
                width,
                height,
            }));
        };
        let frame_index = self.frame_index;

        // Upload and dispatch
        backend.write_buffer(
            &mut self.uniform_buffer,
            bytemuck::bytes_of(&uniforms),
        )?;
        backend.write_buffer(
            &mut self.sphere_buffer,
            bytemuck::cast_slice(&scene.to_gpu()),
        )?;
        let output =
            Self::ensure_output(&mut self.output, backend, width, height)?;

        let bindings = KernelBindings {
            uniforms: &self.uniform_buffer,
            spheres: &self.sphere_buffer,
            random_scalars: self.samples.random_scalars(),
            unit_sphere_points: self.samples.unit_sphere_points(),
            output,
        };
        let commands = backend.dispatch(
            &self.kernel,
            &bindings,
            GridSize::for_image(width, height),
            self.workgroup,
        )?;

        // Submit. The counter only moves once the frame is committed.
        self.frame_index = frame_index.wrapping_add(1);
        backend.submit_with_present(commands, output, image);
        Ok(FrameOutcome::Presented { frame_index })
    }

    /// Output image matching `width` x `height`, reallocated only when the
    /// size changes.
    fn ensure_output<'a>(
        slot: &'a mut Option<OutputImage<B::StorageImage>>,
        backend: &mut B,
        width: u32,
        height: u32,
    ) -> Result<&'a B::StorageImage, TraceError> {
        let output = match slot.take() {
            Some(o) if o.width == width && o.height == height => o,
            _ => {
                log::debug!("allocating {width}x{height} output image");
                OutputImage {
                    image: backend.allocate_image("Trace Output", width, height)?,
                    width,
                    height,
                }
            }
        };
        Ok(&slot.insert(output).image)
    }
}
