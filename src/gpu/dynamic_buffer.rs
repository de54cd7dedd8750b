//! Device buffers with limit checks and automatic growth
//!
//! Buffers grow 2x when a write exceeds capacity and never shrink.

use wgpu::util::DeviceExt;

use crate::error::TraceError;
use crate::gpu::backend::BufferUsage;

/// Smallest buffer ever allocated, in bytes.
const MIN_CAPACITY: u64 = 64;

/// wgpu usage flags for a [`BufferUsage`]. Every buffer is rewritable.
pub fn wgpu_usages(usage: BufferUsage) -> wgpu::BufferUsages {
    let base = match usage {
        BufferUsage::Uniform => wgpu::BufferUsages::UNIFORM,
        BufferUsage::Storage => wgpu::BufferUsages::STORAGE,
    };
    base | wgpu::BufferUsages::COPY_DST
}

/// Reject sizes the device cannot bind before asking wgpu for them; wgpu
/// reports oversize allocations through the device error callback instead.
///
/// # Errors
///
/// [`TraceError::BufferAllocation`] when `size` exceeds a device limit.
pub fn check_size(
    limits: &wgpu::Limits,
    label: &str,
    usage: BufferUsage,
    size: u64,
) -> Result<(), TraceError> {
    let binding_limit = match usage {
        BufferUsage::Uniform => u64::from(limits.max_uniform_buffer_binding_size),
        BufferUsage::Storage => u64::from(limits.max_storage_buffer_binding_size),
    };
    if size > limits.max_buffer_size || size > binding_limit {
        return Err(TraceError::BufferAllocation {
            label: label.to_owned(),
            size,
        });
    }
    Ok(())
}

/// Capacity after growing to hold `needed` bytes.
fn grown_capacity(capacity: u64, needed: u64) -> u64 {
    (needed * 2).max(capacity + 1024)
}

/// A GPU buffer that grows when written past its capacity.
pub struct GpuBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
    len: u64,
    usage: BufferUsage,
    label: String,
}

impl GpuBuffer {
    /// Buffer initialized from `contents`.
    ///
    /// # Errors
    ///
    /// [`TraceError::BufferAllocation`] when the size exceeds device limits.
    pub fn new_with_data(
        device: &wgpu::Device,
        label: &str,
        usage: BufferUsage,
        contents: &[u8],
    ) -> Result<Self, TraceError> {
        let len = contents.len() as u64;
        check_size(&device.limits(), label, usage, len.max(MIN_CAPACITY))?;

        let buffer = if len < MIN_CAPACITY {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: MIN_CAPACITY,
                usage: wgpu_usages(usage),
                mapped_at_creation: true,
            });
            buffer.slice(..).get_mapped_range_mut()[..contents.len()]
                .copy_from_slice(contents);
            buffer.unmap();
            buffer
        } else {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu_usages(usage),
            })
        };

        Ok(Self {
            buffer,
            capacity: len.max(MIN_CAPACITY),
            len,
            usage,
            label: label.to_owned(),
        })
    }

    /// Write `contents` at offset 0, growing if necessary.
    ///
    /// Returns `true` if the buffer was reallocated.
    ///
    /// # Errors
    ///
    /// [`TraceError::BufferAllocation`] when growth exceeds device limits.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        contents: &[u8],
    ) -> Result<bool, TraceError> {
        let needed = contents.len() as u64;

        let reallocated = if needed > self.capacity {
            let limits = device.limits();
            check_size(&limits, &self.label, self.usage, needed)?;
            let new_capacity = grown_capacity(self.capacity, needed)
                .min(limits.max_buffer_size)
                .max(needed);

            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&self.label),
                size: new_capacity,
                usage: wgpu_usages(self.usage),
                mapped_at_creation: false,
            });
            log::debug!(
                "buffer '{}' grown {} -> {new_capacity} bytes",
                self.label,
                self.capacity
            );
            self.capacity = new_capacity;
            true
        } else {
            false
        };

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, contents);
        }
        self.len = needed;

        Ok(reallocated)
    }

    /// Binding over the written bytes only, so `arrayLength` in the kernel
    /// sees the uploaded element count rather than the capacity.
    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: std::num::NonZeroU64::new(self.len),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usages_are_always_copy_dst() {
        for usage in [BufferUsage::Uniform, BufferUsage::Storage] {
            assert!(wgpu_usages(usage).contains(wgpu::BufferUsages::COPY_DST));
        }
        assert!(wgpu_usages(BufferUsage::Uniform).contains(wgpu::BufferUsages::UNIFORM));
        assert!(wgpu_usages(BufferUsage::Storage).contains(wgpu::BufferUsages::STORAGE));
    }

    #[test]
    fn oversize_requests_are_rejected() {
        let limits = wgpu::Limits::default();
        let uniform_max = u64::from(limits.max_uniform_buffer_binding_size);
        assert!(check_size(&limits, "u", BufferUsage::Uniform, 64).is_ok());
        assert!(check_size(&limits, "u", BufferUsage::Uniform, uniform_max).is_ok());

        let err = check_size(&limits, "u", BufferUsage::Uniform, uniform_max + 1)
            .unwrap_err();
        assert!(matches!(
            err,
            TraceError::BufferAllocation { ref label, size } if label == "u" && size == uniform_max + 1
        ));

        let storage_max = u64::from(limits.max_storage_buffer_binding_size);
        assert!(check_size(&limits, "s", BufferUsage::Storage, storage_max + 1).is_err());
    }

    #[test]
    fn growth_at_least_doubles_the_request() {
        assert_eq!(grown_capacity(64, 100), 1088);
        assert_eq!(grown_capacity(64, 4096), 8192);
    }
}
