//! GPU rendering subsystem.
//!
//! Renderers receive a [`RenderCtx`] + [`RenderTarget`] per frame and issue GPU
//! commands via wgpu. Each renderer owns its own GPU resources (pipelines,
//! buffers, textures).
//!
//! Convention:
//! - CPU geometry is in device pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod common;
mod ctx;

pub use common::{compile_wgsl, premul_alpha_blend, viewport_ubo_min_binding_size, ViewportUniform};
pub use ctx::{RenderCtx, RenderTarget};
