//! Uniform blocks shared with the WGSL shaders.
//!
//! Field order and padding follow WGSL uniform layout rules; the tests pin
//! the sizes the shaders expect.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::config::FieldConfig;
use crate::transition::TransitionState;

/// `PositionUniforms` in `position_update.wgsl` (16 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PositionUniforms {
    pub progress: f32,
    pub elapsed: f32,
    pub noise_amplitude: f32,
    pub noise_speed: f32,
}

impl PositionUniforms {
    pub fn new(state: &TransitionState, elapsed: f32, config: &FieldConfig) -> Self {
        Self {
            progress: state.progress(),
            elapsed,
            noise_amplitude: config.noise_amplitude,
            noise_speed: config.noise_speed,
        }
    }
}

/// `ParticleUniforms` in `particles.wgsl` (208 bytes).
///
///  offset   0  view_proj   mat4x4<f32>
///  offset  64  model       mat4x4<f32>
///  offset 128  palette     array<vec4<f32>, 3>
///  offset 176  shape_a     u32
///  offset 180  shape_b     u32
///  offset 184  progress    f32
///  offset 188  point_size  f32
///  offset 192  viewport    vec2<f32>   (physical px)
///  offset 200  elapsed     f32
///  offset 204  _pad        f32
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ParticleUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub palette: [[f32; 4]; 3],
    pub shape_a: u32,
    pub shape_b: u32,
    pub progress: f32,
    pub point_size: f32,
    pub viewport: [f32; 2],
    pub elapsed: f32,
    pub _pad: f32,
}

/// Per-frame inputs of the particle pass.
#[derive(Debug, Copy, Clone)]
pub struct ParticleFrame<'a> {
    pub config: &'a FieldConfig,
    pub state: TransitionState,
    pub elapsed: f32,
    /// Physical pixels.
    pub viewport: [f32; 2],
    pub scale_factor: f32,
}

impl ParticleUniforms {
    /// Packs the frame; unassigned shape slots fall back to index 0.
    pub fn new(frame: &ParticleFrame<'_>) -> Self {
        let config = frame.config;
        let [w, h] = frame.viewport;
        let aspect = if w > 0.0 && h > 0.0 { w / h } else { 1.0 };

        Self {
            view_proj: config.camera.view_proj(aspect).to_cols_array_2d(),
            model: model_matrix(frame.elapsed, config.rotation_speed, config.model_scale)
                .to_cols_array_2d(),
            palette: config.palette.to_uniform(),
            shape_a: frame.state.shape_a().map_or(0, |s| s.index()),
            shape_b: frame.state.shape_b().map_or(0, |s| s.index()),
            progress: frame.state.progress(),
            point_size: config.point_size * frame.scale_factor.max(1.0),
            viewport: [w.max(1.0), h.max(1.0)],
            elapsed: frame.elapsed,
            _pad: 0.0,
        }
    }
}

/// Whole-cloud transform: uniform scale, then rotation about +Y by
/// `elapsed * rotation_speed` radians.
pub fn model_matrix(elapsed: f32, rotation_speed: f32, scale: f32) -> Mat4 {
    Mat4::from_rotation_y(elapsed * rotation_speed) * Mat4::from_scale(glam::Vec3::splat(scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeId;
    use glam::{Vec3, Vec4};

    #[test]
    fn sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<PositionUniforms>(), 16);
        assert_eq!(std::mem::size_of::<ParticleUniforms>(), 208);
        assert_eq!(std::mem::size_of::<ParticleUniforms>() % 16, 0);
    }

    #[test]
    fn field_offsets_match_wgsl_layout() {
        let u = ParticleUniforms::zeroed();
        let base = &u as *const _ as usize;
        assert_eq!(&u.palette as *const _ as usize - base, 128);
        assert_eq!(&u.shape_a as *const _ as usize - base, 176);
        assert_eq!(&u.viewport as *const _ as usize - base, 192);
    }

    #[test]
    fn rotation_follows_elapsed_time() {
        let m = model_matrix(std::f32::consts::FRAC_PI_2, 1.0, 1.0);
        let p = m * Vec4::new(1.0, 0.0, 0.0, 1.0);
        // +X rotated a quarter turn about +Y lands on -Z.
        assert!((p.truncate() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
        assert_eq!(model_matrix(0.0, 5.0, 1.0), Mat4::IDENTITY);
    }

    #[test]
    fn scale_is_applied() {
        let p = model_matrix(0.0, 0.0, 1.7) * Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert!((p.truncate() - Vec3::new(1.7, 3.4, 5.1)).length() < 1e-5);
    }

    #[test]
    fn packs_shape_indices() {
        let config = FieldConfig::default();
        let frame = ParticleFrame {
            config: &config,
            state: TransitionState::new(ShapeId::Rocket, ShapeId::Land, 0.25),
            elapsed: 1.0,
            viewport: [1280.0, 720.0],
            scale_factor: 1.0,
        };
        let u = ParticleUniforms::new(&frame);
        assert_eq!((u.shape_a, u.shape_b), (0, 2));
        assert_eq!(u.progress, 0.25);
        assert_eq!(u.palette[1], config.palette.earth.to_array());
    }

    #[test]
    fn position_uniforms_carry_noise() {
        let config = FieldConfig::default().with_noise(0.5, 3.0);
        let state = TransitionState::new(ShapeId::Earth, ShapeId::Rocket, 0.6);
        let u = PositionUniforms::new(&state, 2.0, &config);
        let expected =
            PositionUniforms { progress: 0.6, elapsed: 2.0, noise_amplitude: 0.5, noise_speed: 3.0 };
        assert_eq!(u, expected);
    }
}
