//! Triangle geometry consumed by the surface sampler.

use glam::Vec3;

use crate::error::MeshError;
use crate::shapes::ShapeId;

/// Indexed triangle mesh.
///
/// Invariants (checked by [`Mesh::new`]):
/// - `indices.len()` is a non-zero multiple of three
/// - every index is in range
/// - every position is finite
///
/// Zero-area triangles are allowed; a mesh made only of them is rejected
/// later by the sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
    uvs: Option<Vec<[f32; 2]>>,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.is_empty() {
            return Err(MeshError::Empty);
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndices(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshError::IndexOutOfRange { index, vertex_count: positions.len() });
        }
        if let Some(v) = positions.iter().position(|p| !p.is_finite()) {
            return Err(MeshError::NonFiniteVertex(v));
        }

        Ok(Self { positions, indices, uvs: None })
    }

    /// Builds a mesh from a non-indexed triangle soup (three positions per triangle).
    pub fn from_triangle_soup(positions: Vec<Vec3>) -> Result<Self, MeshError> {
        let indices = (0..positions.len() as u32).collect();
        Self::new(positions, indices)
    }

    /// Attaches per-vertex texture coordinates.
    ///
    /// The sampler does not use them; they are kept so providers can hand
    /// over their geometry unchanged. Mismatched lengths are dropped.
    pub fn with_uvs(mut self, uvs: Vec<[f32; 2]>) -> Self {
        if uvs.len() == self.positions.len() {
            self.uvs = Some(uvs);
        } else {
            log::debug!(
                "ignoring {} uvs for a mesh with {} vertices",
                uvs.len(),
                self.positions.len()
            );
        }
        self
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn uvs(&self) -> Option<&[[f32; 2]]> {
        self.uvs.as_deref()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of triangle `t`. Panics when `t` is out of range.
    pub fn triangle(&self, t: usize) -> [Vec3; 3] {
        let i = &self.indices[t * 3..t * 3 + 3];
        [
            self.positions[i[0] as usize],
            self.positions[i[1] as usize],
            self.positions[i[2] as usize],
        ]
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.triangle_count()).map(|t| self.triangle(t))
    }

    /// Sum of all triangle areas.
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(triangle_area).sum()
    }
}

/// Area of a triangle, computed in `f64` so tiny triangles on large meshes
/// still contribute.
pub fn triangle_area([a, b, c]: [Vec3; 3]) -> f64 {
    let ab = (b - a).as_dvec3();
    let ac = (c - a).as_dvec3();
    0.5 * ab.cross(ac).length()
}

/// Source of reference geometry, one mesh per [`ShapeId`].
///
/// Providers are queried once at startup. An `Err` marks the shape as
/// unavailable; it is never replaced by placeholder geometry.
pub trait MeshProvider {
    fn load(&mut self, shape: ShapeId) -> Result<Mesh, MeshError>;
}

impl<F> MeshProvider for F
where
    F: FnMut(ShapeId) -> Result<Mesh, MeshError>,
{
    fn load(&mut self, shape: ShapeId) -> Result<Mesh, MeshError> {
        self(shape)
    }
}
