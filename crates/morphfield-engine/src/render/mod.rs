//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers, bind groups) and
//! record passes into the frame's encoder through [`RenderTarget`].
//!
//! Besides the swapchain target this module provides off-screen
//! floating-point targets ([`OffscreenTarget`]) for render-to-texture passes
//! and the shared full-screen quad geometry used to drive them.

mod ctx;
pub mod common;
mod offscreen;

pub use ctx::{RenderCtx, RenderTarget, Viewport};
pub use offscreen::OffscreenTarget;
