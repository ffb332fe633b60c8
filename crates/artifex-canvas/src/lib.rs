//! Artifex canvas.
//!
//! The stroke-capture-and-render core of the drawing surface:
//! - [`capture`] turns pointer/touch drags into begin/extend/end gestures
//! - [`store`] accumulates completed strokes plus the one in progress
//! - [`geometry`] maps a stroke from input-surface space to device space
//! - [`renderer`] draws every stroke as a line strip and reads frames back
//!
//! [`DrawingSurface`] owns the store and the redraw scheduler; the host passes
//! it explicitly to the capture controller and the renderer.

pub mod capture;
pub mod geometry;
pub mod redraw;
pub mod renderer;
pub mod store;
pub mod stroke;
pub mod surface;

pub use capture::{Gesture, GestureTracker, InputCapture};
pub use geometry::{build_vertices, StrokeVertex};
pub use redraw::{RedrawFlag, RedrawScheduler};
pub use renderer::{BrushImage, CanvasStyle, FrameRenderer, FrameStats, RasterImage, SnapshotError};
pub use store::StrokeStore;
pub use stroke::{Point, Stroke};
pub use surface::DrawingSurface;
