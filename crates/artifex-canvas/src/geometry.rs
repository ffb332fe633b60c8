//! Input-surface → device-space vertex generation.

use artifex_engine::coords::Viewport;
use bytemuck::{Pod, Zeroable};

use crate::stroke::Stroke;

/// One line-strip vertex in device (framebuffer) pixels.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct StrokeVertex {
    pub pos: [f32; 2],
}

impl StrokeVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { pos: [x, y] }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StrokeVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Maps `stroke` from input-surface space into `target` space.
///
/// Each axis is scaled independently:
/// `x' = x / input.width * target.width`, `y' = y / input.height * target.height`.
///
/// Returns an empty list when the stroke has fewer than two points or the
/// input surface has no area (zero, negative or non-finite size).
pub fn build_vertices(stroke: &Stroke, input: Viewport, target: Viewport) -> Vec<StrokeVertex> {
    if !stroke.is_drawable() || !input.is_valid() {
        return Vec::new();
    }

    let sx = target.width / input.width;
    let sy = target.height / input.height;

    stroke
        .points()
        .iter()
        .map(|p| StrokeVertex::new(p.x * sx, p.y * sy))
        .collect()
}
