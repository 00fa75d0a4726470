//! Procedural stand-ins for the three reference models.
//!
//! Everything is built from two primitives: a lathe (a profile curve revolved
//! around +Y) and a displaced grid. All shapes fit roughly in the unit ball;
//! the field's model scale sizes them on screen.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use morphfield_particles::mesh::{Mesh, MeshProvider};
use morphfield_particles::{MeshError, ShapeId};

/// Mesh provider that generates every shape on the fly.
#[derive(Debug, Clone, Copy)]
pub struct ProceduralMeshes {
    /// Angular resolution of revolved shapes.
    pub segments: u32,
    /// Rings of the planet, vertices per side of the island grid.
    pub rings: u32,
}

impl Default for ProceduralMeshes {
    fn default() -> Self {
        Self { segments: 48, rings: 32 }
    }
}

impl MeshProvider for ProceduralMeshes {
    fn load(&mut self, shape: ShapeId) -> Result<Mesh, MeshError> {
        let mesh = match shape {
            ShapeId::Rocket => rocket(self.segments),
            ShapeId::Earth => planet(self.segments, self.rings),
            ShapeId::Land => island(self.rings * 2),
        }?;
        log::debug!("generated {shape}: {} triangles", mesh.triangle_count());
        Ok(mesh)
    }
}

// ── shapes ────────────────────────────────────────────────────────────────

/// Hull, nose cone and nozzle flare revolved around Y, plus three fins.
pub fn rocket(segments: u32) -> Result<Mesh, MeshError> {
    const PROFILE: [(f32, f32); 9] = [
        (0.00, -1.00),
        (0.18, -1.00),
        (0.26, -0.82),
        (0.30, -0.62),
        (0.30, 0.50),
        (0.26, 0.74),
        (0.18, 0.95),
        (0.08, 1.12),
        (0.00, 1.20),
    ];

    let mut builder = MeshBuilder::default();
    builder.lathe(&PROFILE, segments);

    for k in 0..3 {
        let angle = k as f32 * TAU / 3.0;
        let (s, c) = angle.sin_cos();
        let out = |r: f32, y: f32| Vec3::new(r * c, y, r * s);
        builder.triangle(out(0.30, -0.55), out(0.62, -1.00), out(0.30, -0.05));
    }

    builder.build()
}

/// UV sphere of radius 1.
pub fn planet(segments: u32, rings: u32) -> Result<Mesh, MeshError> {
    let rings = rings.max(2);
    let profile: Vec<(f32, f32)> = (0..=rings)
        .map(|i| {
            let theta = PI * i as f32 / rings as f32;
            (theta.sin(), -theta.cos())
        })
        .collect();

    let mut builder = MeshBuilder::default();
    builder.lathe(&profile, segments);
    builder.build()
}

/// A hilly island on a `[-1, 1]²` grid, heights in `[0, ~0.55]`.
pub fn island(resolution: u32) -> Result<Mesh, MeshError> {
    let n = resolution.max(2);
    let mut builder = MeshBuilder::default();

    let base = builder.vertex_count();
    for row in 0..=n {
        for col in 0..=n {
            let x = -1.0 + 2.0 * col as f32 / n as f32;
            let z = -1.0 + 2.0 * row as f32 / n as f32;
            builder.positions.push(Vec3::new(x, island_height(x, z), z));
        }
    }

    let stride = n + 1;
    for row in 0..n {
        for col in 0..n {
            let i = base + row * stride + col;
            builder.quad(i, i + 1, i + stride + 1, i + stride);
        }
    }

    builder.build()
}

/// Island height field: a central hill, a smaller ridge and some ripples,
/// all fading towards the edges.
pub fn island_height(x: f32, z: f32) -> f32 {
    let d2 = x * x + z * z;
    let hill = 0.45 * (-3.0 * d2).exp();
    let ridge = 0.18 * (-6.0 * ((x - 0.45).powi(2) + (z + 0.3).powi(2))).exp();
    let ripples = 0.04 * (5.0 * x).sin() * (4.0 * z).cos() * (-2.0 * d2).exp();
    (hill + ridge + ripples).max(0.0)
}

// ── builder ───────────────────────────────────────────────────────────────

#[derive(Default)]
struct MeshBuilder {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    fn triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let base = self.vertex_count();
        self.positions.extend([a, b, c]);
        self.indices.extend([base, base + 1, base + 2]);
    }

    fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend([a, b, c, a, c, d]);
    }

    /// Revolves `profile` (radius, height) pairs around +Y.
    ///
    /// Points with zero radius produce degenerate triangles; they carry no
    /// area and are never sampled.
    fn lathe(&mut self, profile: &[(f32, f32)], segments: u32) {
        let segments = segments.max(3);
        let base = self.vertex_count();

        for &(r, y) in profile {
            for j in 0..segments {
                let (s, c) = (TAU * j as f32 / segments as f32).sin_cos();
                self.positions.push(Vec3::new(r * c, y, r * s));
            }
        }

        let at = |ring: usize, j: u32| base + ring as u32 * segments + j % segments;
        for ring in 0..profile.len().saturating_sub(1) {
            for j in 0..segments {
                self.quad(at(ring, j), at(ring + 1, j), at(ring + 1, j + 1), at(ring, j + 1));
            }
        }
    }

    fn build(self) -> Result<Mesh, MeshError> {
        Mesh::new(self.positions, self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_radius(mesh: &Mesh) -> f32 {
        mesh.positions().iter().map(|p| p.length()).fold(0.0, f32::max)
    }

    // ── rocket ────────────────────────────────────────────────────────────

    #[test]
    fn rocket_is_upright_and_bounded() {
        let mesh = rocket(16).unwrap();
        let (lo, hi) = mesh
            .positions()
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        assert_eq!(lo, -1.0);
        assert_eq!(hi, 1.2);
        assert!(max_radius(&mesh) < 1.5);
    }

    #[test]
    fn rocket_has_hull_and_fins() {
        let mesh = rocket(16).unwrap();
        // 8 profile bands of 16 quads, plus 3 fins.
        assert_eq!(mesh.triangle_count(), 8 * 16 * 2 + 3);
        assert!(mesh.surface_area() > 0.0);
    }

    // ── planet ────────────────────────────────────────────────────────────

    #[test]
    fn planet_vertices_lie_on_unit_sphere() {
        let mesh = planet(24, 12).unwrap();
        for p in mesh.positions() {
            assert!((p.length() - 1.0).abs() < 1e-5, "{p:?}");
        }
    }

    #[test]
    fn planet_area_approaches_sphere() {
        let mesh = planet(96, 48).unwrap();
        let sphere = 4.0 * std::f64::consts::PI;
        assert!((mesh.surface_area() - sphere).abs() / sphere < 0.01);
    }

    // ── island ────────────────────────────────────────────────────────────

    #[test]
    fn island_grid_counts() {
        let mesh = island(10).unwrap();
        assert_eq!(mesh.positions().len(), 11 * 11);
        assert_eq!(mesh.triangle_count(), 10 * 10 * 2);
    }

    #[test]
    fn island_peaks_near_centre() {
        let centre = island_height(0.0, 0.0);
        assert!(centre > island_height(0.9, 0.9));
        assert!(centre > 0.4);
        assert!(island_height(1.0, -1.0) >= 0.0);
    }

    // ── provider ──────────────────────────────────────────────────────────

    #[test]
    fn provider_builds_every_shape() {
        let mut meshes = ProceduralMeshes { segments: 12, rings: 8 };
        for shape in ShapeId::ALL {
            let mesh = meshes.load(shape).unwrap();
            assert!(mesh.surface_area() > 0.0, "{shape}");
        }
    }
}
