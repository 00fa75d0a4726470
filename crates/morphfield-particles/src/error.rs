//! Error taxonomy for the particle field.
//!
//! - [`MeshError`]: the mesh provider could not supply usable geometry
//!   (asset errors, malformed buffers).
//! - [`SampleError`]: degenerate input to the samplers (zero area, zero size).
//! - [`FieldError`]: everything the field surfaces at setup or per tick,
//!   wrapping the above plus GPU resource and transition-state failures.

use thiserror::Error;

use crate::shapes::ShapeId;

/// Geometry could not be loaded or is malformed.
#[derive(Debug, Error)]
pub enum MeshError {
    /// The provider failed to produce geometry for a shape.
    #[error("failed to load mesh for {shape}: {reason}")]
    Unavailable { shape: ShapeId, reason: String },

    /// Index buffer length is not a multiple of three.
    #[error("index count {0} is not a multiple of 3")]
    RaggedIndices(usize),

    /// An index points past the end of the position buffer.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// A vertex position contains NaN or infinity.
    #[error("vertex {0} has a non-finite position")]
    NonFiniteVertex(usize),

    /// The mesh contains no triangles at all.
    #[error("mesh has no triangles")]
    Empty,
}

/// Degenerate input to the surface sampler or the randomness generator.
#[derive(Debug, Error, PartialEq)]
pub enum SampleError {
    /// Every triangle of the mesh has zero area.
    #[error("degenerate mesh: total surface area is zero")]
    DegenerateMesh,

    /// A texture of side zero was requested.
    #[error("texture size must be positive")]
    ZeroSize,

    /// `size²` does not fit the texel index space.
    #[error("texture size {0} is too large")]
    TooLarge(u32),
}

/// Errors surfaced by the particle field.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    /// A GPU resource could not be allocated.
    #[error("GPU resource error: {0:#}")]
    Resource(#[from] anyhow::Error),

    /// The transition state was read before `TransitionController::initialize`.
    #[error("transition state used before initialization")]
    UninitializedTransition,

    /// A shape slot references a shape whose texture does not exist.
    #[error("{0} is not available")]
    ShapeUnavailable(ShapeId),

    /// No reference shape could be built at all.
    #[error("no shapes available")]
    NoShapes,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),
}
