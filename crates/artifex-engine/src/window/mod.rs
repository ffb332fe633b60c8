//! Window + event loop.
//!
//! [`Runtime::run`] opens a single window, binds a GPU surface to it and
//! drives a [`core::App`](crate::core::App) until it asks to exit.

mod host;
mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
