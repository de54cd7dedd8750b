//! Ray-tracing compute kernel: hint query, composition and pipeline setup.

use crate::error::TraceError;
use crate::gpu::backend::KernelInfo;
use crate::gpu::pipeline_helpers::{
    create_compute_pipeline, storage_buffer_read_only, uniform_buffer,
    write_only_storage_texture,
};
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::STORAGE_FORMAT;
use crate::options::KernelOptions;
use crate::renderer::workgroup::{KernelHints, WorkgroupSize};
use crate::renderer::BindingSlot;

/// Kernel entry point name.
pub const ENTRY_POINT: &str = "main";

/// Execution width used when the vendor is unknown.
const DEFAULT_THREAD_WIDTH: u32 = 32;

/// Shader defs that fix the kernel's `@workgroup_size`.
#[must_use]
pub fn workgroup_defs(group: WorkgroupSize) -> [(&'static str, u32); 2] {
    [("GROUP_WIDTH", group.width), ("GROUP_HEIGHT", group.height)]
}

/// SIMD width typical of the adapter's vendor.
fn vendor_thread_width(vendor: u32) -> u32 {
    match vendor {
        0x1002 => 64, // AMD
        0x8086 => 16, // Intel
        _ => DEFAULT_THREAD_WIDTH,
    }
}

/// Scheduling hints for an adapter from `vendor` (PCI vendor id) with
/// `limits`, applying any overrides.
#[must_use]
pub fn query_hints(
    vendor: u32,
    limits: &wgpu::Limits,
    overrides: &KernelOptions,
) -> KernelHints {
    KernelHints {
        preferred_thread_width: overrides
            .preferred_thread_width
            .unwrap_or_else(|| vendor_thread_width(vendor)),
        max_threads_per_group: overrides
            .max_threads_per_group
            .unwrap_or(limits.max_compute_invocations_per_workgroup)
            .min(limits.max_compute_invocations_per_workgroup),
    }
}

/// Compiled kernel with the layout its bindings must follow.
pub struct ComputeKernel {
    /// Compute pipeline.
    pub pipeline: wgpu::ComputePipeline,
    /// Layout of `@group(0)`.
    pub bind_group_layout: wgpu::BindGroupLayout,
    hints: KernelHints,
    workgroup: WorkgroupSize,
}

impl ComputeKernel {
    /// Compose and compile the kernel for `hints`.
    ///
    /// # Errors
    ///
    /// [`TraceError::KernelLoad`] if composition fails.
    pub fn load(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        hints: KernelHints,
    ) -> Result<Self, TraceError> {
        let limits = device.limits();
        let workgroup = WorkgroupSize::from_hints(hints).clamped(
            limits.max_compute_workgroup_size_x,
            limits.max_compute_workgroup_size_y,
        );

        let bind_group_layout = Self::create_bind_group_layout(device);
        let shader =
            composer.compose(device, Shader::RayTrace, &workgroup_defs(workgroup))?;
        let pipeline = create_compute_pipeline(
            device,
            "Ray Trace",
            &shader,
            ENTRY_POINT,
            &[&bind_group_layout],
        );

        log::info!(
            "kernel '{ENTRY_POINT}' loaded: thread width {}, max {} threads, group {}x{}",
            hints.preferred_thread_width,
            hints.max_threads_per_group,
            workgroup.width,
            workgroup.height,
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            hints,
            workgroup,
        })
    }

    fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Ray Trace Bind Group Layout"),
            entries: &[
                uniform_buffer(BindingSlot::Uniforms.index()),
                storage_buffer_read_only(BindingSlot::Spheres.index()),
                storage_buffer_read_only(BindingSlot::RandomScalars.index()),
                storage_buffer_read_only(BindingSlot::UnitSpherePoints.index()),
                write_only_storage_texture(BindingSlot::Output.index(), STORAGE_FORMAT),
            ],
        })
    }
}

impl KernelInfo for ComputeKernel {
    fn hints(&self) -> KernelHints {
        self.hints
    }

    fn workgroup(&self) -> WorkgroupSize {
        self.workgroup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMD: u32 = 0x1002;
    const NVIDIA: u32 = 0x10DE;

    #[test]
    fn hints_follow_vendor_and_limits() {
        let limits = wgpu::Limits::default();
        let hints = query_hints(AMD, &limits, &KernelOptions::default());
        assert_eq!(hints.preferred_thread_width, 64);
        assert_eq!(
            hints.max_threads_per_group,
            limits.max_compute_invocations_per_workgroup
        );
        let hints = query_hints(NVIDIA, &limits, &KernelOptions::default());
        assert_eq!(hints.preferred_thread_width, 32);
    }

    #[test]
    fn overrides_win_but_never_exceed_the_device() {
        let limits = wgpu::Limits::default();
        let overrides = KernelOptions {
            preferred_thread_width: Some(8),
            max_threads_per_group: Some(1 << 20),
        };
        let hints = query_hints(AMD, &limits, &overrides);
        assert_eq!(hints.preferred_thread_width, 8);
        assert_eq!(
            hints.max_threads_per_group,
            limits.max_compute_invocations_per_workgroup
        );
    }

    #[test]
    fn workgroup_defs_name_both_axes() {
        let defs = workgroup_defs(WorkgroupSize {
            width: 16,
            height: 16,
            depth: 1,
        });
        assert_eq!(defs, [("GROUP_WIDTH", 16), ("GROUP_HEIGHT", 16)]);
    }
}
