//! Coordinate and size types shared across the engine and the canvas.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Device space uses the same orientation in physical pixels; shaders convert
//! to NDC with a viewport uniform.

mod extent;
mod viewport;

pub use extent::Extent;
pub use viewport::Viewport;
