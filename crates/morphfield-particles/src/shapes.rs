//! Reference shapes and their sampled position textures.

use std::fmt;

use rand::Rng;

use crate::error::FieldError;
use crate::mesh::MeshProvider;
use crate::sampler;
use crate::texels::TexelGrid;

/// One of the reference meshes the field can morph between.
///
/// The discriminant is the shader-side index used to pick tint colours.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeId {
    Rocket = 0,
    Earth = 1,
    Land = 2,
}

impl ShapeId {
    pub const ALL: [ShapeId; 3] = [ShapeId::Rocket, ShapeId::Earth, ShapeId::Land];

    #[inline]
    pub const fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShapeId::Rocket => "rocket",
            ShapeId::Earth => "earth",
            ShapeId::Land => "land",
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sampled surface positions of one shape. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeTexture {
    pub shape: ShapeId,
    pub grid: TexelGrid,
}

/// Every shape the field knows about, each either sampled or unavailable.
///
/// Built once at startup; a shape whose mesh could not be loaded or sampled
/// stays unavailable for the lifetime of the library.
#[derive(Debug, Default)]
pub struct ShapeLibrary {
    textures: [Option<ShapeTexture>; 3],
    failures: Vec<(ShapeId, FieldError)>,
}

impl ShapeLibrary {
    /// Loads and samples every [`ShapeId`] at `size × size`.
    ///
    /// A failing shape is recorded and logged; the other shapes are still
    /// built. Only a zero or oversized `size` fails the whole library, since
    /// it would fail every shape identically.
    pub fn build<P, R>(provider: &mut P, size: u32, rng: &mut R) -> Result<Self, FieldError>
    where
        P: MeshProvider + ?Sized,
        R: Rng,
    {
        crate::texels::texel_count(size)?;

        let mut library = Self::default();
        for shape in ShapeId::ALL {
            let built = provider
                .load(shape)
                .map_err(FieldError::from)
                .and_then(|mesh| {
                    log::debug!(
                        "sampling {shape}: {} triangles, area {:.3}",
                        mesh.triangle_count(),
                        mesh.surface_area()
                    );
                    sampler::sample(&mesh, size, rng).map_err(FieldError::from)
                });

            match built {
                Ok(grid) => library.insert(ShapeTexture { shape, grid }),
                Err(err) => {
                    log::warn!("{shape} unavailable: {err}");
                    library.failures.push((shape, err));
                }
            }
        }

        if library.is_empty() {
            return Err(FieldError::NoShapes);
        }

        log::info!(
            "shape library ready: {} of {} shapes at {size}x{size}",
            library.available().count(),
            ShapeId::ALL.len()
        );
        Ok(library)
    }

    /// Library made from already-sampled textures.
    pub fn from_textures(textures: impl IntoIterator<Item = ShapeTexture>) -> Self {
        let mut library = Self::default();
        for texture in textures {
            library.insert(texture);
        }
        library
    }

    fn insert(&mut self, texture: ShapeTexture) {
        let slot = texture.shape.index() as usize;
        self.textures[slot] = Some(texture);
    }

    pub fn get(&self, shape: ShapeId) -> Option<&ShapeTexture> {
        self.textures[shape.index() as usize].as_ref()
    }

    pub fn is_available(&self, shape: ShapeId) -> bool {
        self.get(shape).is_some()
    }

    pub fn available(&self) -> impl Iterator<Item = ShapeId> + '_ {
        ShapeId::ALL.into_iter().filter(|&s| self.is_available(s))
    }

    pub fn is_empty(&self) -> bool {
        self.available().next().is_none()
    }

    /// Shapes that failed to build, with the reason.
    pub fn failures(&self) -> &[(ShapeId, FieldError)] {
        &self.failures
    }

    /// Texture side shared by every available shape.
    pub fn size(&self) -> Option<u32> {
        self.textures.iter().flatten().map(|t| t.grid.size()).next()
    }
}
