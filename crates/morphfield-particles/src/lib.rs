//! Scroll-driven particle field on top of `morphfield-engine`.
//!
//! A fixed population of `size × size` particles is sampled from the surface
//! of three reference meshes. Scrolling past page sections moves the field
//! from one shape to the next; the blend itself runs on the GPU each frame.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`mesh`] | `Mesh`, `MeshProvider` |
//! | [`sampler`] | area-weighted surface sampling |
//! | [`random`] | per-particle randomness table |
//! | [`shapes`] | `ShapeId`, `ShapeLibrary` |
//! | [`kernel`] | CPU reference of the position blend |
//! | [`scroll`] | `ScrollSource`, triggers and their events |
//! | [`transition`] | `TransitionState`, `TransitionController` |
//! | [`gpu`] | position pass and particle renderer |
//! | [`field`] | `ParticleField`, tying it all together |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use morphfield_particles::prelude::*;
//!
//! // Earth -> Rocket while "sect-1" scrolls by, Rocket -> Land on "sect-2".
//! let sections = [
//!     ScrollSection::new("sect-1", ElementBounds::new(1000.0, 1000.0)),
//!     ScrollSection::new("sect-2", ElementBounds::new(2000.0, 1000.0)),
//! ];
//! let mut field = ParticleField::new(&render_ctx, FieldConfig::default(), &mut meshes, &sections, 800.0)?;
//!
//! // Each frame:
//! field.scroll_to(page_offset);
//! field.render(&render_ctx, &mut target, time.elapsed);
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod field;
pub mod gpu;
pub mod kernel;
pub mod mesh;
pub mod random;
pub mod sampler;
pub mod scroll;
pub mod shapes;
pub mod texels;
pub mod transition;

pub use config::FieldConfig;
pub use error::{FieldError, MeshError, SampleError};
pub use field::ParticleField;
pub use shapes::ShapeId;

/// The types an embedding application usually needs.
pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::config::{FieldConfig, Palette};
    pub use crate::error::{FieldError, MeshError};
    pub use crate::field::ParticleField;
    pub use crate::mesh::{Mesh, MeshProvider};
    pub use crate::scroll::{ElementBounds, ScrollSection};
    pub use crate::shapes::ShapeId;
    pub use crate::transition::TransitionState;
}
