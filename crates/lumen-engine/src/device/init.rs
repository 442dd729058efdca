/// How the canvas asks for its GPU context.
///
/// The canvas pipeline uses no optional wgpu features, so only adapter
/// choice and presentation are configurable.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,
    pub prefer_srgb: bool,
    /// `Fifo` ties every present to a display refresh, which is the pace
    /// the frame loop ticks at.
    pub present_mode: wgpu::PresentMode,
    /// Used only when the surface supports it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub limits: wgpu::Limits,
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            limits: wgpu::Limits::downlevel_defaults(),
            frame_latency: 2,
        }
    }
}
