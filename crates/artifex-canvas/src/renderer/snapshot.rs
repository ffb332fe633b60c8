use std::path::Path;

use anyhow::{Context, Result};
use image::ImageEncoder;
use thiserror::Error;

use super::target::CanvasTarget;

/// Why a snapshot readback produced no image.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no frame has been rendered yet")]
    NoFrame,
    #[error("readback buffer could not be mapped: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    #[error("device poll failed: {0}")]
    Poll(String),
    #[error("readback callback was dropped before completing")]
    MapCallbackDropped,
}

/// CPU-side copy of a rendered frame: straight RGBA8, rows top to bottom,
/// no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl RasterImage {
    /// Strips per-row padding from a texture readback and normalizes the
    /// channel order to RGBA.
    pub fn from_padded_rows(
        width: u32,
        height: u32,
        padded_bytes_per_row: u32,
        data: &[u8],
        format: wgpu::TextureFormat,
    ) -> Self {
        let row = width as usize * 4;
        let stride = padded_bytes_per_row as usize;

        let mut rgba = Vec::with_capacity(row * height as usize);
        for chunk in data.chunks(stride).take(height as usize) {
            rgba.extend_from_slice(&chunk[..row.min(chunk.len())]);
        }

        if matches!(
            format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        ) {
            for px in rgba.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
        }

        Self { width, height, rgba }
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

    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out)
            .write_image(&self.rgba, self.width, self.height, image::ExtendedColorType::Rgba8)
            .context("failed to encode PNG")?;
        Ok(out)
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Copies `target` into a mappable buffer and blocks until it can be read.
pub(crate) fn read_back(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    target: &CanvasTarget,
) -> Result<RasterImage, SnapshotError> {
    let size = target.size();
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_bytes_per_row = (size.width * 4).div_ceil(align) * align;

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("artifex snapshot readback"),
        size: padded_bytes_per_row as u64 * size.height as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("artifex snapshot encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: target.texture(),
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bytes_per_row),
                rows_per_image: Some(size.height),
            },
        },
        size.to_wgpu(),
    );
    queue.submit(Some(encoder.finish()));

    let (sender, receiver) = std::sync::mpsc::channel();
    buffer.slice(..).map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    device
        .poll(wgpu::PollType::wait_indefinitely())
        .map_err(|e| SnapshotError::Poll(e.to_string()))?;
    receiver
        .recv()
        .map_err(|_| SnapshotError::MapCallbackDropped)??;

    let image = {
        let mapped = buffer.slice(..).get_mapped_range();
        RasterImage::from_padded_rows(
            size.width,
            size.height,
            padded_bytes_per_row,
            &mapped,
            target.texture().format(),
        )
    };
    buffer.unmap();

    Ok(image)
}
