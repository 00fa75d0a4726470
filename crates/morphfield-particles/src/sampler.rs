//! Area-weighted random points on a mesh surface.

use glam::Vec3;
use rand::Rng;

use crate::error::SampleError;
use crate::mesh::{Mesh, triangle_area};
use crate::texels::TexelGrid;

/// Draws points uniformly distributed over the surface of a [`Mesh`].
///
/// A triangle is picked with probability proportional to its area (binary
/// search over cumulative areas), then a uniform barycentric point inside it.
pub struct SurfaceSampler<'m> {
    mesh: &'m Mesh,
    /// Running sum of triangle areas; last element is the total.
    cumulative: Vec<f64>,
}

impl<'m> SurfaceSampler<'m> {
    pub fn new(mesh: &'m Mesh) -> Result<Self, SampleError> {
        let mut total = 0.0;
        let cumulative: Vec<f64> = mesh
            .triangles()
            .map(|tri| {
                total += triangle_area(tri);
                total
            })
            .collect();

        if !(total > 0.0 && total.is_finite()) {
            return Err(SampleError::DegenerateMesh);
        }

        Ok(Self { mesh, cumulative })
    }

    pub fn total_area(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Index of the triangle covering the cumulative-area value `u · total`.
    fn pick_triangle(&self, u: f64) -> usize {
        let target = u * self.total_area();
        let t = self.cumulative.partition_point(|&c| c <= target);
        // `u` is in [0, 1) but rounding can land exactly on the total.
        t.min(self.cumulative.len() - 1)
    }

    /// One random point on the surface.
    pub fn sample_point<R: Rng>(&self, rng: &mut R) -> Vec3 {
        let t = self.pick_triangle(rng.random::<f64>());
        let [a, b, c] = self.mesh.triangle(t);

        let mut r1: f32 = rng.random();
        let mut r2: f32 = rng.random();
        // Fold the far half of the parallelogram back into the triangle.
        if r1 + r2 > 1.0 {
            r1 = 1.0 - r1;
            r2 = 1.0 - r2;
        }

        a + (b - a) * r1 + (c - a) * r2
    }

    /// Fills a `size × size` grid with surface samples (`w = 1`).
    pub fn sample_grid<R: Rng>(
        &self,
        size: u32,
        rng: &mut R,
    ) -> Result<TexelGrid, SampleError> {
        TexelGrid::from_fn(size, |_| {
            let p = self.sample_point(rng);
            [p.x, p.y, p.z, 1.0]
        })
    }
}

/// Samples `size²` surface points of `mesh` into a texel grid.
pub fn sample<R: Rng>(
    mesh: &Mesh,
    size: u32,
    rng: &mut R,
) -> Result<TexelGrid, SampleError> {
    crate::texels::texel_count(size)?;
    SurfaceSampler::new(mesh)?.sample_grid(size, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    fn unit_triangle() -> Mesh {
        Mesh::from_triangle_soup(vec![Vec3::ZERO, Vec3::X, Vec3::Y]).unwrap()
    }

    // ── basic contract ────────────────────────────────────────────────────

    #[test]
    fn grid_has_size_squared_texels_with_unit_w() {
        let grid = sample(&unit_triangle(), 16, &mut rng()).unwrap();
        assert_eq!(grid.size(), 16);
        assert_eq!(grid.len(), 256);
        assert!(grid.texels().iter().all(|t| t[3] == 1.0));
    }

    #[test]
    fn unit_triangle_points_stay_inside() {
        let grid = sample(&unit_triangle(), 4, &mut rng()).unwrap();
        assert_eq!(grid.len(), 16);
        for &[x, y, z, w] in grid.texels() {
            assert_eq!(z, 0.0);
            assert_eq!(w, 1.0);
            assert!(x >= 0.0 && y >= 0.0);
            assert!(x + y <= 1.0 + 1e-6, "({x}, {y}) outside the triangle");
        }
    }

    #[test]
    fn zero_size_fails() {
        assert_eq!(sample(&unit_triangle(), 0, &mut rng()), Err(SampleError::ZeroSize));
    }

    #[test]
    fn zero_area_mesh_fails() {
        let flat = Mesh::from_triangle_soup(vec![
            Vec3::ZERO,
            Vec3::X,
            Vec3::X * 2.0,
            Vec3::Y,
            Vec3::Y,
            Vec3::Y,
        ])
        .unwrap();
        assert_eq!(sample(&flat, 4, &mut rng()), Err(SampleError::DegenerateMesh));
    }

    #[test]
    fn zero_size_is_reported_before_degenerate_mesh() {
        let flat = Mesh::from_triangle_soup(vec![Vec3::ZERO; 3]).unwrap();
        assert_eq!(sample(&flat, 0, &mut rng()), Err(SampleError::ZeroSize));
    }

    #[test]
    fn degenerate_triangles_are_never_picked() {
        // A sliver of zero area between two real triangles.
        let mesh = Mesh::from_triangle_soup(vec![
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::new(5.0, 5.0, 5.0),
            Vec3::new(6.0, 6.0, 6.0),
            Vec3::new(7.0, 7.0, 7.0),
            Vec3::Z,
            Vec3::Z + Vec3::X,
            Vec3::Z + Vec3::Y,
        ])
        .unwrap();
        let grid = sample(&mesh, 32, &mut rng()).unwrap();
        assert!(grid.texels().iter().all(|t| t[0] + t[1] <= 1.0 + 1e-6));
    }

    // ── distribution ──────────────────────────────────────────────────────

    #[test]
    fn samples_are_area_weighted() {
        // Two disjoint triangles with areas 0.5 and 1.5 (ratio 1:3).
        let mesh = Mesh::from_triangle_soup(vec![
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(13.0, 0.0, 0.0),
            Vec3::new(10.0, 1.0, 0.0),
        ])
        .unwrap();

        let grid = sample(&mesh, 200, &mut rng()).unwrap();
        let big = grid.texels().iter().filter(|t| t[0] >= 5.0).count();
        let share = big as f64 / grid.len() as f64;
        assert!((share - 0.75).abs() < 0.02, "share of larger triangle was {share}");
    }

    #[test]
    fn samples_cover_the_triangle_uniformly() {
        // Split the unit triangle at x + y = 0.5: the inner part holds a quarter of the area.
        let grid = sample(&unit_triangle(), 200, &mut rng()).unwrap();
        let inner = grid.texels().iter().filter(|t| t[0] + t[1] < 0.5).count();
        let share = inner as f64 / grid.len() as f64;
        assert!((share - 0.25).abs() < 0.02, "inner share was {share}");
    }

    #[test]
    fn pick_triangle_clamps_to_last() {
        let mesh = unit_triangle();
        let sampler = SurfaceSampler::new(&mesh).unwrap();
        assert_eq!(sampler.pick_triangle(1.0), 0);
        assert_eq!(sampler.pick_triangle(0.0), 0);
    }
}
