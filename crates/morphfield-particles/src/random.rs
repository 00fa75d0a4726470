//! Per-particle random vectors.

use rand::Rng;

use crate::error::SampleError;
use crate::texels::TexelGrid;

/// Lower bound of every random component.
pub const RANDOM_MIN: f32 = -1.0;
/// Upper bound of every random component.
pub const RANDOM_MAX: f32 = 1.0;

/// Generates a `size × size` grid whose texels hold three independent
/// components uniform in `[-1, 1]` (`w = 1`).
///
/// The shaders rely on that range: the position pass derives a phase and a
/// signed offset from it, the particle pass derives size and alpha jitter.
pub fn generate<R: Rng>(size: u32, rng: &mut R) -> Result<TexelGrid, SampleError> {
    TexelGrid::from_fn(size, |_| {
        [
            rng.random_range(RANDOM_MIN..=RANDOM_MAX),
            rng.random_range(RANDOM_MIN..=RANDOM_MAX),
            rng.random_range(RANDOM_MIN..=RANDOM_MAX),
            1.0,
        ]
    })
}

/// xyz of every texel, in particle order; uploaded as per-instance data.
pub fn instance_vectors(grid: &TexelGrid) -> Vec<[f32; 3]> {
    grid.texels().iter().map(|&[x, y, z, _]| [x, y, z]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn components_lie_in_range() {
        let grid = generate(32, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(grid.len(), 1024);
        for t in grid.texels() {
            for &c in &t[..3] {
                assert!((RANDOM_MIN..=RANDOM_MAX).contains(&c));
            }
            assert_eq!(t[3], 1.0);
        }
    }

    #[test]
    fn values_are_not_constant() {
        let grid = generate(16, &mut StdRng::seed_from_u64(11)).unwrap();
        for axis in 0..3 {
            let first = grid.texels()[0][axis];
            assert!(grid.texels().iter().any(|t| t[axis] != first), "axis {axis} is constant");
        }
    }

    #[test]
    fn both_signs_occur() {
        let grid = generate(16, &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(grid.texels().iter().any(|t| t[0] < 0.0));
        assert!(grid.texels().iter().any(|t| t[0] > 0.0));
    }

    #[test]
    fn zero_size_fails() {
        assert_eq!(generate(0, &mut StdRng::seed_from_u64(0)), Err(SampleError::ZeroSize));
    }

    #[test]
    fn same_seed_same_table() {
        let a = generate(8, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate(8, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn instance_vectors_drop_w() {
        let grid = generate(2, &mut StdRng::seed_from_u64(1)).unwrap();
        let v = instance_vectors(&grid);
        assert_eq!(v.len(), 4);
        assert_eq!(v[3][0], grid.texels()[3][0]);
    }
}
