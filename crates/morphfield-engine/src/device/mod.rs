//! wgpu device and window surface.
//!
//! [`Gpu`] owns the instance, adapter, device and queue together with the
//! surface of one window. Each frame acquires a [`GpuFrame`], records into
//! its encoder and hands it back for submission.

mod context;
mod init;
mod surface;

pub use context::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
