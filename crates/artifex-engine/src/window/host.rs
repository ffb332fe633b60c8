use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

use crate::coords::Extent;
use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::InputState;
use crate::render::RenderCtx;

use super::runtime::{Request, RuntimeConfig, RuntimeCtx};

// The surface borrows the window, so both live in one self-referencing cell.
#[self_referencing]
struct Surface {
    input: InputState,
    frames: u64,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// `winit` handler owning the app and its single window.
pub(super) struct Host<A: App> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    surface: Option<Surface>,
    exiting: bool,
    failure: Option<anyhow::Error>,
}

impl<A: App> Host<A> {
    pub(super) fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            surface: None,
            exiting: false,
            failure: None,
        }
    }

    pub(super) fn into_result(self) -> Result<()> {
        self.failure.map_or(Ok(()), Err)
    }

    fn quit(&mut self, event_loop: &ActiveEventLoop) {
        if !self.exiting {
            self.exiting = true;
            self.app.on_exit();
        }
        event_loop.exit();
    }

    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(self.config.title.clone())
                    .with_inner_size(self.config.initial_size),
            )
            .context("failed to create window")?;
        let id = window.id();
        let init = self.gpu_init.clone();

        let surface = SurfaceTryBuilder {
            input: InputState::default(),
            frames: 0,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let app = &mut self.app;
        surface
            .with(|s| {
                let size = s.gpu.size();
                let ctx = RenderCtx::new(
                    s.gpu.device(),
                    s.gpu.queue(),
                    s.gpu.surface_format(),
                    WindowCtx { id, window: s.window }.logical_size(),
                    Extent::new(size.width, size.height),
                );
                app.on_surface_ready(&ctx)
            })
            .context("renderer initialization failed")?;

        surface.with_window(|w| w.request_redraw());
        self.surface = Some(surface);
        log::info!("window {id:?} open");
        Ok(())
    }

    fn redraw(&mut self, id: WindowId, runtime: &mut RuntimeCtx) {
        let Some(surface) = self.surface.as_mut() else { return };
        let app = &mut self.app;

        let control = surface.with_mut(|s| {
            let mut ctx = FrameCtx {
                window: WindowCtx { id, window: s.window },
                gpu: s.gpu,
                input: s.input,
                frame_index: *s.frames,
                runtime: &mut *runtime,
            };
            let control = app.on_frame(&mut ctx);
            *s.frames = s.frames.wrapping_add(1);
            control
        });

        if control == AppControl::Exit {
            runtime.exit();
        }
    }

    fn resize(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            let size = surface.with_window(|w| w.inner_size());
            surface.with_gpu_mut(|gpu| gpu.resize(size));
            surface.with_window(|w| w.request_redraw());
        }
    }

    fn drain(&mut self, event_loop: &ActiveEventLoop, runtime: RuntimeCtx) {
        let quit = runtime.wants_exit();
        for request in runtime.queued {
            if let (Request::Title(title), Some(surface)) = (request, self.surface.as_ref()) {
                surface.with_window(|w| w.set_title(&title));
            }
        }
        if quit {
            self.quit(event_loop);
        }
    }
}

impl<A: App> ApplicationHandler for Host<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() || self.exiting {
            return;
        }
        if let Err(e) = self.open(event_loop) {
            log::error!("startup failed: {e:#}");
            self.failure = Some(e);
            self.quit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exiting {
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::Wait);

        // One redraw per batch of events, however many changes it carried.
        if self.app.take_redraw_request() {
            if let Some(surface) = self.surface.as_ref() {
                surface.with_window(|w| w.request_redraw());
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.exiting {
            event_loop.exit();
            return;
        }
        let Some(surface) = self.surface.as_mut() else { return };
        if surface.with_window(|w| w.id()) != id {
            return;
        }

        let mut runtime = RuntimeCtx::default();
        let app = &mut self.app;
        let control = surface.with_mut(|s| {
            let translated = translate_window_event(s.window, s.input, &event)?;
            let control = app.on_input(&translated, s.input, &mut runtime);
            s.input.apply_event(&translated);
            Some(control)
        });
        if control == Some(AppControl::Exit) {
            runtime.exit();
        }

        match event {
            WindowEvent::CloseRequested => runtime.exit(),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resize(),
            WindowEvent::RedrawRequested => self.redraw(id, &mut runtime),
            _ => {}
        }

        self.drain(event_loop, runtime);
    }
}
