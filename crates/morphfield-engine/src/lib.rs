//! morphfield engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the particle
//! field and the studio binary: window loop, wgpu device/surface, frame
//! timing, input translation and the renderer-facing context.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
pub mod paint;
