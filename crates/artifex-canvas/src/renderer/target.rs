use artifex_engine::coords::Extent;

/// Storage format of the offscreen canvas every frame is rendered into.
pub(crate) const CANVAS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Offscreen render target holding the most recent frame.
///
/// The drawable is presented at the end of each frame and cannot be read
/// afterwards; this texture can, which is what snapshots copy from.
pub(crate) struct CanvasTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: Extent,
}

impl CanvasTarget {
    pub(crate) fn new(device: &wgpu::Device, size: Extent) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("artifex canvas target"),
            size: size.to_wgpu(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: CANVAS_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[CANVAS_FORMAT.remove_srgb_suffix()],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("canvas target created at {}x{}", size.width, size.height);
        Self { texture, view, size }
    }

    #[inline]
    pub(crate) fn size(&self) -> Extent {
        self.size
    }

    #[inline]
    pub(crate) fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    #[inline]
    pub(crate) fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// View the blit pass samples through when presenting into `surface_format`.
    pub(crate) fn blit_view(&self, surface_format: wgpu::TextureFormat) -> wgpu::TextureView {
        let format = blit_source_format(surface_format);
        self.texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("artifex canvas blit view"),
            format: Some(format),
            ..Default::default()
        })
    }
}

/// sRGB drawables re-encode on store, so they sample the canvas decoded.
/// Linear drawables get the stored (already encoded) bytes unchanged.
pub(crate) fn blit_source_format(surface_format: wgpu::TextureFormat) -> wgpu::TextureFormat {
    if surface_format.is_srgb() {
        CANVAS_FORMAT
    } else {
        CANVAS_FORMAT.remove_srgb_suffix()
    }
}
