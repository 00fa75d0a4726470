//! Square RGBA float grids shared by every per-particle texture.
//!
//! Particle `i` lives at texel `(i % size, i / size)` in every grid. The
//! same mapping is used by the shaders and by [`crate::kernel`].

use crate::error::SampleError;

/// Largest side whose `size²` texel count still fits a `u32` particle index.
pub const MAX_SIZE: u32 = 1 << 15;

/// Texel coordinate of particle `i` on a grid of side `size`.
#[inline]
pub fn texel_coord(i: u32, size: u32) -> (u32, u32) {
    (i % size, i / size)
}

/// Checks a requested grid side and returns the texel count.
pub fn texel_count(size: u32) -> Result<usize, SampleError> {
    if size == 0 {
        return Err(SampleError::ZeroSize);
    }
    if size > MAX_SIZE {
        return Err(SampleError::TooLarge(size));
    }
    Ok(size as usize * size as usize)
}

/// Immutable `size × size` grid of RGBA32F texels, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct TexelGrid {
    size: u32,
    texels: Vec<[f32; 4]>,
}

impl TexelGrid {
    /// Builds a grid by evaluating `f` for every particle index in order.
    pub fn from_fn(
        size: u32,
        mut f: impl FnMut(u32) -> [f32; 4],
    ) -> Result<Self, SampleError> {
        let count = texel_count(size)?;
        let texels = (0..count as u32).map(&mut f).collect();
        Ok(Self { size, texels })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.texels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texels.is_empty()
    }

    pub fn texels(&self) -> &[[f32; 4]] {
        &self.texels
    }

    /// Texel of particle `i`.
    pub fn get(&self, i: u32) -> Option<[f32; 4]> {
        self.texels.get(i as usize).copied()
    }

    /// Texel at grid coordinate `(x, y)`.
    pub fn at(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.get(y * self.size + x)
    }

    /// Raw bytes for `Queue::write_texture` (`Rgba32Float`, tightly packed).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Bytes per texture row.
    pub fn bytes_per_row(&self) -> u32 {
        self.size * std::mem::size_of::<[f32; 4]>() as u32
    }
}
