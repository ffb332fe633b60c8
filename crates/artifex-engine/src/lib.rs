//! Artifex engine crate.
//!
//! Owns the platform + GPU runtime pieces the canvas and the studio build on:
//! device/surface management, the window loop, input translation and logging.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
