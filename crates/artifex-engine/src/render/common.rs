//! Shared GPU types and utilities used by renderers.

use anyhow::{bail, Result};
use bytemuck::{Pod, Zeroable};

// ── blend ─────────────────────────────────────────────────────────────────

pub fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    #[inline]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: [width.max(1.0), height.max(1.0)],
            _pad: [0.0; 2],
        }
    }
}

/// Minimum binding size for the viewport uniform buffer.
pub fn viewport_ubo_min_binding_size() -> wgpu::BufferSize {
    wgpu::BufferSize::new(std::mem::size_of::<ViewportUniform>() as u64)
        .unwrap_or(wgpu::BufferSize::MIN)
}

// ── shader compilation ────────────────────────────────────────────────────

/// Creates a WGSL shader module and fails if the compiler reported errors.
///
/// wgpu reports shader errors asynchronously through the device error handler;
/// checking the compilation info here turns them into a startup error instead.
pub fn compile_wgsl(device: &wgpu::Device, label: &str, source: &str) -> Result<wgpu::ShaderModule> {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let info = pollster::block_on(module.get_compilation_info());
    let errors: Vec<String> = info
        .messages
        .iter()
        .filter(|m| m.message_type == wgpu::CompilationMessageType::Error)
        .map(|m| m.message.clone())
        .collect();

    for m in &info.messages {
        if m.message_type != wgpu::CompilationMessageType::Error {
            log::debug!("{label}: {}", m.message);
        }
    }

    if !errors.is_empty() {
        bail!("shader `{label}` failed to compile: {}", errors.join("; "));
    }

    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_uniform_is_sixteen_bytes() {
        assert_eq!(viewport_ubo_min_binding_size().get(), 16);
    }

    #[test]
    fn viewport_uniform_never_zero() {
        let u = ViewportUniform::new(0.0, 480.0);
        assert_eq!(u.viewport, [1.0, 480.0]);
    }
}
