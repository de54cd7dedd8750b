//! Kernel-writable output texture.

/// Format the kernel stores pixels in. Surfaces are rarely storage-capable,
/// so the kernel writes here and the blit pass copies to the swapchain.
pub const STORAGE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A storage texture the kernel writes and the blit pass samples.
///
/// Only the view is kept; it holds the texture alive.
pub struct StorageTarget {
    /// Full-texture view, bound as a storage texture and as a sampled one.
    pub view: wgpu::TextureView,
}

impl StorageTarget {
    /// Create a `width` x `height` storage texture in [`STORAGE_FORMAT`].
    #[must_use]
    pub fn new(device: &wgpu::Device, label: &str, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: STORAGE_FORMAT,
            usage: wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { view }
    }
}
