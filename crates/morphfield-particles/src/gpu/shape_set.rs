use crate::error::FieldError;
use crate::shapes::{ShapeId, ShapeLibrary};
use crate::texels::TexelGrid;

/// Format of every particle texture: one position (or random vector) per texel.
pub const PARTICLE_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// An immutable, uploaded `size × size` particle texture.
pub struct GridTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl GridTexture {
    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        grid: &TexelGrid,
    ) -> GridTexture {
        let size = wgpu::Extent3d {
            width: grid.size(),
            height: grid.size(),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: PARTICLE_TEXTURE_FORMAT,
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
            grid.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(grid.bytes_per_row()),
                rows_per_image: Some(grid.size()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        GridTexture { texture, view }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }
}

/// GPU copies of the shape textures plus the randomness table.
///
/// Owned by the position pass; shapes missing from the library have no
/// texture here and can never be bound.
pub struct GpuShapeSet {
    shapes: [Option<GridTexture>; 3],
    random: GridTexture,
    size: u32,
}

impl GpuShapeSet {
    /// Uploads every available shape and the randomness table.
    ///
    /// Fails when the grids disagree on size or exceed the device's 2D
    /// texture limit.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        library: &ShapeLibrary,
        random: &TexelGrid,
    ) -> Result<Self, FieldError> {
        let size = random.size();
        check_texture_side(size, device.limits().max_texture_dimension_2d)?;

        let mut shapes: [Option<GridTexture>; 3] = [None, None, None];
        for shape in library.available() {
            let Some(texture) = library.get(shape) else { continue };
            if texture.grid.size() != size {
                return Err(FieldError::Config(format!(
                    "{shape} texture is {}x{0}, randomness table is {size}x{size}",
                    texture.grid.size()
                )));
            }
            let label = format!("morphfield {shape} positions");
            shapes[shape.index() as usize] = Some(GridTexture::upload(device, queue, &label, &texture.grid));
        }

        let random = GridTexture::upload(device, queue, "morphfield randomness", random);
        log::debug!(
            "uploaded {} shape textures + randomness at {size}x{size}",
            shapes.iter().flatten().count()
        );

        Ok(Self { shapes, random, size })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn shape(&self, shape: ShapeId) -> Result<&GridTexture, FieldError> {
        self.shapes[shape.index() as usize]
            .as_ref()
            .ok_or(FieldError::ShapeUnavailable(shape))
    }

    pub fn random(&self) -> &GridTexture {
        &self.random
    }

    pub fn is_available(&self, shape: ShapeId) -> bool {
        self.shapes[shape.index() as usize].is_some()
    }
}

fn check_texture_side(size: u32, max: u32) -> Result<(), FieldError> {
    if size > max {
        return Err(FieldError::Resource(anyhow::anyhow!(
            "particle texture side {size} exceeds the device limit of {max}"
        )));
    }
    Ok(())
}

/// Bind-group layout entry for a non-filterable float texture read with `textureLoad`.
pub(crate) fn unfilterable_texture_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_side_at_the_limit_fits() {
        assert!(check_texture_side(8192, 8192).is_ok());
        assert!(check_texture_side(1, 8192).is_ok());
    }

    #[test]
    fn oversized_texture_is_a_resource_error() {
        let err = check_texture_side(8193, 8192).unwrap_err();
        assert!(matches!(err, FieldError::Resource(_)));
        assert!(err.to_string().contains("8192"), "{err}");
    }
}
