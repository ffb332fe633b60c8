use crate::coords::{Extent, Viewport};

/// What a renderer needs to know about the device and the two coordinate spaces.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Input surface: the window in logical pixels.
    pub viewport: Viewport,
    /// Render target: the drawable in physical pixels.
    pub target_size: Extent,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        target_size: Extent,
    ) -> Self {
        Self { device, queue, surface_format, viewport, target_size }
    }

    /// The drawable size as a float viewport, for coordinate mapping.
    #[inline]
    pub fn target_viewport(&self) -> Viewport {
        self.target_size.to_viewport()
    }
}

/// The current frame's encoder and the drawable view to render into.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}
