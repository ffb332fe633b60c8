use std::path::Path;

use anyhow::{ensure, Context, Result};
use artifex_engine::coords::Extent;

/// Decoded brush texture in straight RGBA8.
///
/// The stroke shader tiles it across the canvas in device pixels and
/// modulates the stroke color with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrushImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl BrushImage {
    /// 1×1 opaque white: strokes render in the plain stroke color.
    pub fn solid_white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }

    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "brush image has zero size");
        ensure!(
            rgba.len() == width as usize * height as usize * 4,
            "brush data is {} bytes, expected {}x{}x4",
            rgba.len(),
            width,
            height
        );
        Ok(Self { width, height, rgba })
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).context("failed to decode brush image")?;
        let rgba = img.to_rgba8();
        let (w, h) = rgba.dimensions();
        Self::from_rgba(w, h, rgba.into_raw())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read brush texture {}", path.display()))?;
        Self::decode(&bytes).with_context(|| format!("brush texture {}", path.display()))
    }

    /// Loads `path` if given, falling back to [`solid_white`](Self::solid_white)
    /// with a warning when it cannot be read or decoded.
    pub fn load_or_fallback(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::solid_white();
        };
        match Self::load(path) {
            Ok(brush) => {
                log::info!("brush texture {} ({}x{})", path.display(), brush.width, brush.height);
                brush
            }
            Err(e) => {
                log::warn!("{e:#}; using plain strokes");
                Self::solid_white()
            }
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Creates the GPU texture and uploads the pixels.
    pub(crate) fn upload(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::Texture {
        let size = self.extent().to_wgpu();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("artifex brush texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * 4),
                rows_per_image: Some(self.height),
            },
            size,
        );

        texture
    }
}

impl Default for BrushImage {
    fn default() -> Self {
        Self::solid_white()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageEncoder;

    fn png_bytes(w: u32, h: u32, rgba: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out)
            .write_image(rgba, w, h, image::ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    #[test]
    fn decodes_png() {
        let pixels = [10, 20, 30, 255, 40, 50, 60, 128];
        let brush = BrushImage::decode(&png_bytes(2, 1, &pixels)).unwrap();
        assert_eq!((brush.width(), brush.height()), (2, 1));
        assert_eq!(brush.as_rgba(), &pixels);
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(BrushImage::decode(b"not an image").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_white() {
        let brush = BrushImage::load_or_fallback(Some(Path::new("/nonexistent/brush.png")));
        assert_eq!(brush, BrushImage::solid_white());
        assert_eq!(BrushImage::load_or_fallback(None).as_rgba(), &[255, 255, 255, 255]);
    }

    #[test]
    fn rgba_length_is_checked() {
        assert!(BrushImage::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(BrushImage::from_rgba(0, 2, Vec::new()).is_err());
    }
}
