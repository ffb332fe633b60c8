//! Paint model shared between the canvas and renderers.
//!
//! Only solid colors exist; strokes carry no per-stroke styling.

pub mod color;

pub use color::Color;
