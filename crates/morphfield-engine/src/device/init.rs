/// Device and surface options used when the window opens.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB swapchain format when the surface offers one, so the
    /// additive particle blend happens in linear space.
    pub prefer_srgb: bool,

    /// FIFO paces the field to the display: one tick per presented frame.
    pub present_mode: wgpu::PresentMode,

    /// Falls back to the surface's first mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// `Rgba32Float` render targets and `textureLoad` are core; nothing
    /// extra is needed by default.
    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Hint only; backends may ignore it.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
