/// Surface and device preferences for [`Gpu::new`](super::Gpu::new).
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,
    /// Pick an sRGB drawable when the surface offers one, so blending and
    /// exported snapshots match what is on screen.
    pub prefer_srgb: bool,
    /// FIFO by default: redraws are paced to the display.
    pub present_mode: wgpu::PresentMode,
    /// Ignored when the surface does not support it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            frame_latency: 2,
        }
    }
}
