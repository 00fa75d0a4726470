//! CPU evaluation of the position-update blend.
//!
//! Mirrors `gpu/shaders/position_update.wgsl` operation for operation so the
//! GPU pass can be checked without a readback.

use std::f32::consts::PI;

use crate::error::FieldError;
use crate::texels::TexelGrid;

/// Per-particle drift applied on top of the shape blend.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Noise {
    /// World-space amplitude. `0.0` disables the drift entirely.
    pub amplitude: f32,
    /// Angular speed of the drift, radians per second.
    pub speed: f32,
}

impl Noise {
    pub const OFF: Noise = Noise { amplitude: 0.0, speed: 0.0 };
}

impl Default for Noise {
    fn default() -> Self {
        Self { amplitude: 0.02, speed: 1.5 }
    }
}

/// Phase offset derived from a particle's random vector, in `[-π, π]`.
#[inline]
pub fn phase(random: [f32; 4]) -> f32 {
    random[1] * PI
}

/// `a + (b - a) * t`, the exact form used by the shader.
#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// New position of one particle.
///
/// `progress` is clamped to `[0, 1]`. With `noise.amplitude == 0` the result
/// is exactly the blend of `a` and `b`; `w` is carried through the blend.
pub fn blend_texel(
    a: [f32; 4],
    b: [f32; 4],
    random: [f32; 4],
    progress: f32,
    elapsed: f32,
    noise: Noise,
) -> [f32; 4] {
    let t = progress.clamp(0.0, 1.0);
    let wave = noise.amplitude * (elapsed * noise.speed + phase(random)).sin();

    [
        mix(a[0], b[0], t) + random[0] * wave,
        mix(a[1], b[1], t) + random[1] * wave,
        mix(a[2], b[2], t) + random[2] * wave,
        mix(a[3], b[3], t),
    ]
}

/// Runs [`blend_texel`] over whole grids, as one position-pass tick would.
pub fn blend_grid(
    a: &TexelGrid,
    b: &TexelGrid,
    random: &TexelGrid,
    progress: f32,
    elapsed: f32,
    noise: Noise,
) -> Result<TexelGrid, FieldError> {
    let size = a.size();
    if b.size() != size || random.size() != size {
        return Err(FieldError::Config(format!(
            "grid sizes differ: a={size} b={} random={}",
            b.size(),
            random.size()
        )));
    }

    let (a, b, r) = (a.texels(), b.texels(), random.texels());
    let grid = TexelGrid::from_fn(size, |i| {
        let i = i as usize;
        blend_texel(a[i], b[i], r[i], progress, elapsed, noise)
    })?;
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random;
    use crate::sampler;
    use crate::mesh::Mesh;
    use glam::Vec3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn grids(size: u32) -> (TexelGrid, TexelGrid, TexelGrid) {
        let mut rng = StdRng::seed_from_u64(99);
        let rocket = Mesh::from_triangle_soup(vec![Vec3::ZERO, Vec3::X, Vec3::Y]).unwrap();
        let land = Mesh::from_triangle_soup(vec![
            Vec3::new(0.0, -2.0, 1.0),
            Vec3::new(3.0, -2.0, 1.0),
            Vec3::new(0.0, -2.0, 4.0),
        ])
        .unwrap();
        (
            sampler::sample(&rocket, size, &mut rng).unwrap(),
            sampler::sample(&land, size, &mut rng).unwrap(),
            random::generate(size, &mut rng).unwrap(),
        )
    }

    #[test]
    fn identical_shapes_reproduce_the_shape() {
        let (earth, _, r) = grids(8);
        for progress in [0.0, 0.3, 1.0] {
            let out = blend_grid(&earth, &earth, &r, progress, 12.5, Noise::OFF).unwrap();
            assert_eq!(out, earth);
        }
    }

    #[test]
    fn endpoints_select_a_and_b() {
        let (a, b, r) = grids(8);
        assert_eq!(blend_grid(&a, &b, &r, 0.0, 3.0, Noise::OFF).unwrap(), a);
        let end = blend_grid(&a, &b, &r, 1.0, 3.0, Noise::OFF).unwrap();
        for (o, q) in end.texels().iter().zip(b.texels()) {
            for c in 0..4 {
                assert!((o[c] - q[c]).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn halfway_is_the_midpoint() {
        let (a, b, r) = grids(8);
        let out = blend_grid(&a, &b, &r, 0.5, 0.0, Noise::OFF).unwrap();
        for i in 0..out.len() {
            let (p, q, o) = (a.texels()[i], b.texels()[i], out.texels()[i]);
            for c in 0..3 {
                assert!((o[c] - 0.5 * (p[c] + q[c])).abs() < 1e-5);
            }
            assert_eq!(o[3], 1.0);
        }
    }

    #[test]
    fn progress_is_clamped() {
        let (a, b, r) = grids(4);
        assert_eq!(
            blend_grid(&a, &b, &r, 1.7, 0.0, Noise::OFF).unwrap(),
            blend_grid(&a, &b, &r, 1.0, 0.0, Noise::OFF).unwrap()
        );
        assert_eq!(
            blend_grid(&a, &b, &r, -0.2, 0.0, Noise::OFF).unwrap(),
            blend_grid(&a, &b, &r, 0.0, 0.0, Noise::OFF).unwrap()
        );
    }

    #[test]
    fn noise_is_bounded_by_amplitude() {
        let (a, b, r) = grids(8);
        let noise = Noise { amplitude: 0.1, speed: 2.0 };
        let clean = blend_grid(&a, &b, &r, 0.4, 0.0, Noise::OFF).unwrap();
        for elapsed in [0.0, 0.7, 5.3] {
            let noisy = blend_grid(&a, &b, &r, 0.4, elapsed, noise).unwrap();
            for (n, c) in noisy.texels().iter().zip(clean.texels()) {
                for k in 0..3 {
                    assert!((n[k] - c[k]).abs() <= 0.1 + 1e-5);
                }
            }
        }
    }

    #[test]
    fn noise_moves_particles_over_time() {
        let (a, b, r) = grids(4);
        let noise = Noise { amplitude: 0.1, speed: 2.0 };
        let t0 = blend_grid(&a, &b, &r, 0.5, 0.0, noise).unwrap();
        let t1 = blend_grid(&a, &b, &r, 0.5, 0.4, noise).unwrap();
        assert_ne!(t0, t1);
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let (a, _, r) = grids(4);
        let (b, _, _) = grids(8);
        assert!(matches!(
            blend_grid(&a, &b, &r, 0.5, 0.0, Noise::OFF),
            Err(FieldError::Config(_))
        ));
    }
}
