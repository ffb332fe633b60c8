//! wgpu device and window surface.
//!
//! [`Gpu`] owns the device/queue and the configured drawable; frames are
//! acquired as [`GpuFrame`]s and surface failures are classified by
//! [`SurfaceErrorAction`].

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
