//! GPU side of the field: shape uploads, the position-update pass and the
//! particle sprite pass.

mod particle_renderer;
mod position_pass;
mod shape_set;
mod uniforms;

pub use particle_renderer::{ParticleInstance, ParticleRenderer, particle_instances};
pub use position_pass::PositionPass;
pub use shape_set::{GpuShapeSet, GridTexture, PARTICLE_TEXTURE_FORMAT};
pub use uniforms::{ParticleFrame, ParticleUniforms, PositionUniforms, model_matrix};
