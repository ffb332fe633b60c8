use anyhow::{Context, Result};
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;

use crate::core::App;
use crate::device::GpuInit;

use super::host::Host;

/// Initial window settings.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "artifex".to_string(),
            initial_size: LogicalSize::new(768.0, 768.0),
        }
    }
}

/// Requests an app can make from inside a callback.
///
/// Nothing happens immediately: the host drains the queue once the callback
/// has returned.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    pub(super) queued: Vec<Request>,
}

#[derive(Debug, PartialEq)]
pub(super) enum Request {
    Title(String),
    Quit,
}

impl RuntimeCtx {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.queued.push(Request::Title(title.into()));
    }

    pub fn exit(&mut self) {
        self.queued.push(Request::Quit);
    }

    pub(super) fn wants_exit(&self) -> bool {
        self.queued.contains(&Request::Quit)
    }
}

pub struct Runtime;

impl Runtime {
    /// Runs `app` in a new window until it exits.
    ///
    /// Startup failures (window, GPU, [`App::on_surface_ready`]) end the loop
    /// and are returned here.
    pub fn run<A: App + 'static>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()> {
        let event_loop = EventLoop::new().context("could not create the event loop")?;
        let mut host = Host::new(config, gpu_init, app);

        event_loop
            .run_app(&mut host)
            .context("event loop exited with an error")?;

        host.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_queued_in_order() {
        let mut ctx = RuntimeCtx::default();
        assert!(!ctx.wants_exit());
        ctx.set_title("a");
        ctx.exit();
        assert_eq!(ctx.queued, vec![Request::Title("a".into()), Request::Quit]);
        assert!(ctx.wants_exit());
    }
}
