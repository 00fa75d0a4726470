//! Which shapes are blended, and how far along the blend is.

mod controller;
mod state;

pub use controller::{Boundary, SEQUENCE, TransitionController};
pub use state::TransitionState;
