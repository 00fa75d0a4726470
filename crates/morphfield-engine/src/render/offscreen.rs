use anyhow::{ensure, Result};

/// A square-or-rectangular off-screen color target that can be rendered into
/// and sampled from later (render-to-texture).
///
/// The texture is allocated once; a pass that writes it is expected to cover
/// the full extent, so no clear-before-read guarantee is needed.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    /// Allocates a `width × height` target usable both as a render attachment
    /// and as a texture binding.
    ///
    /// Fails when the requested extent is zero or exceeds the device's 2D
    /// texture limit.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        ensure!(width > 0 && height > 0, "{label}: zero-sized render target");
        let max = device.limits().max_texture_dimension_2d;
        ensure!(
            width <= max && height <= max,
            "{label}: {width}x{height} exceeds the device texture limit of {max}"
        );

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!("allocated off-screen target '{label}' {width}x{height} {format:?}");

        Ok(Self { texture, view, format, width, height })
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
