//! wgpu implementation of [`GpuBackend`].

use crate::error::TraceError;
use crate::gpu::backend::{BufferUsage, GpuBackend, KernelBindings};
use crate::gpu::blit::BlitPass;
use crate::gpu::dynamic_buffer::GpuBuffer;
use crate::gpu::kernel::ComputeKernel;
use crate::gpu::render_context::{RenderContext, SurfaceImage};
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::StorageTarget;
use crate::renderer::workgroup::{GridSize, WorkgroupSize};
use crate::renderer::BindingSlot;

/// Device-side half of the wgpu adapter. The surface half is
/// [`RenderContext`], which implements
/// [`PresentationSurface`](crate::gpu::backend::PresentationSurface).
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    blit: BlitPass,
}

impl WgpuBackend {
    /// Backend sharing `context`'s device and queue.
    ///
    /// # Errors
    ///
    /// [`TraceError::KernelLoad`] if the blit shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
    ) -> Result<Self, TraceError> {
        let blit = BlitPass::new(&context.device, composer, context.format())?;
        Ok(Self {
            device: context.device.clone(),
            queue: context.queue.clone(),
            blit,
        })
    }
}

impl GpuBackend for WgpuBackend {
    type Buffer = GpuBuffer;
    type StorageImage = StorageTarget;
    type Image = SurfaceImage;
    type Kernel = ComputeKernel;
    type Commands = wgpu::CommandEncoder;

    fn allocate_buffer(
        &mut self,
        label: &str,
        usage: BufferUsage,
        contents: &[u8],
    ) -> Result<GpuBuffer, TraceError> {
        GpuBuffer::new_with_data(&self.device, label, usage, contents)
    }

    fn write_buffer(
        &mut self,
        buffer: &mut GpuBuffer,
        contents: &[u8],
    ) -> Result<(), TraceError> {
        let _ = buffer.write(&self.device, &self.queue, contents)?;
        Ok(())
    }

    fn allocate_image(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
    ) -> Result<StorageTarget, TraceError> {
        let max = self.device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(TraceError::BufferAllocation {
                label: label.to_owned(),
                size: u64::from(width) * u64::from(height) * 4,
            });
        }
        Ok(StorageTarget::new(&self.device, label, width, height))
    }

    fn dispatch(
        &mut self,
        kernel: &ComputeKernel,
        bindings: &KernelBindings<'_, Self>,
        grid: GridSize,
        group: WorkgroupSize,
    ) -> Result<wgpu::CommandEncoder, TraceError> {
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Ray Trace Bind Group"),
            layout: &kernel.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: BindingSlot::Uniforms.index(),
                    resource: bindings.uniforms.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: BindingSlot::Spheres.index(),
                    resource: bindings.spheres.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: BindingSlot::RandomScalars.index(),
                    resource: bindings.random_scalars.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: BindingSlot::UnitSpherePoints.index(),
                    resource: bindings.unit_sphere_points.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: BindingSlot::Output.index(),
                    resource: wgpu::BindingResource::TextureView(&bindings.output.view),
                },
            ],
        });

        let mut encoder =
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Frame Encoder"),
                });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Ray Trace Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&kernel.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            let (x, y, z) = grid.group_count(group);
            pass.dispatch_workgroups(x, y, z);
        }
        Ok(encoder)
    }

    fn submit_with_present(
        &mut self,
        mut commands: wgpu::CommandEncoder,
        output: &StorageTarget,
        image: SurfaceImage,
    ) {
        self.blit
            .encode(&self.device, &mut commands, &output.view, &image.view);
        let _ = self.queue.submit(std::iter::once(commands.finish()));
        image.frame.present();
    }
}
