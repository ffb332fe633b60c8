use artifex_canvas::{BrushImage, DrawingSurface, FrameRenderer, FrameStats, InputCapture, Stroke};
use artifex_engine::core::{App, AppControl, FrameCtx, FrameOutcome};
use artifex_engine::input::{InputEvent, InputState, Key};
use artifex_engine::render::RenderCtx;
use artifex_engine::window::RuntimeCtx;

use crate::config::StudioConfig;
use crate::{export, session};

/// Studio shell: wires input, the drawing surface and the renderer together.
pub struct ArtifexApp {
    config: StudioConfig,
    brush: BrushImage,
    surface: DrawingSurface,
    capture: InputCapture,
    renderer: Option<FrameRenderer>,
    snapshot_requested: bool,
}

impl ArtifexApp {
    pub fn new(config: StudioConfig, brush: BrushImage, initial_strokes: Vec<Stroke>) -> Self {
        let mut surface = DrawingSurface::default();
        surface.load_initial_strokes(initial_strokes);
        Self {
            config,
            brush,
            surface,
            capture: InputCapture::new(),
            renderer: None,
            snapshot_requested: false,
        }
    }

    fn save_session(&self) {
        let Some(path) = self.config.session_file.as_deref() else {
            return;
        };
        if let Err(e) = session::save(path, &self.surface.current_strokes()) {
            log::error!("{e:#}");
        }
    }

    fn export_snapshot(&self, ctx: &mut FrameCtx<'_, '_>) {
        let Some(renderer) = self.renderer.as_ref() else { return };

        let notice = match renderer.snapshot(ctx.gpu.device(), ctx.gpu.queue()) {
            Some(image) => match export::save_snapshot(&self.config.export_dir, &image) {
                Ok(path) => {
                    let name = path.file_name().unwrap_or(path.as_os_str());
                    format!("saved {}", name.to_string_lossy())
                }
                Err(e) => {
                    log::warn!("export failed: {e:#}");
                    "export failed".to_string()
                }
            },
            None => "snapshot unavailable".to_string(),
        };

        ctx.runtime.set_title(format!("{} ({notice})", self.config.title));
    }
}

impl App for ArtifexApp {
    fn on_surface_ready(&mut self, ctx: &RenderCtx<'_>) -> anyhow::Result<()> {
        self.renderer = Some(FrameRenderer::new(ctx, self.config.canvas_style(), &self.brush)?);
        Ok(())
    }

    fn on_input(
        &mut self,
        event: &InputEvent,
        _input: &InputState,
        runtime: &mut RuntimeCtx,
    ) -> AppControl {
        if event.is_key_press(Key::Escape) {
            return AppControl::Exit;
        }

        if event.is_key_press(Key::Char('c')) || event.is_key_press(Key::Delete) {
            self.surface.clear_canvas();
            runtime.set_title(self.config.title.clone());
            return AppControl::Continue;
        }

        // The readback needs the device, which is only reachable from a frame.
        // That frame renders the same store, so the export matches the screen.
        if event.is_key_press(Key::Char('s')) {
            self.snapshot_requested = true;
            self.surface.request_redraw();
            return AppControl::Continue;
        }

        self.capture.handle_event(&mut self.surface, event);
        AppControl::Continue
    }

    fn take_redraw_request(&mut self) -> bool {
        self.surface.redraw_mut().take()
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(renderer) = self.renderer.as_mut() else {
            log::error!("frame requested before the renderer was created");
            return AppControl::Exit;
        };

        let store = self.surface.store();
        let background = renderer.style().background;
        let mut stats = FrameStats::default();

        let outcome = ctx.render(background, |rctx, target| {
            stats = renderer.render(rctx, target, store.snapshot_strokes());
        });

        log::trace!(
            "frame {}: {:?} strokes={} draws={} vertices={}",
            ctx.frame_index,
            outcome,
            stats.strokes,
            stats.draw_calls,
            stats.vertices
        );

        if self.snapshot_requested {
            if outcome == FrameOutcome::Presented {
                self.snapshot_requested = false;
                self.export_snapshot(ctx);
            } else {
                // Retry once a frame goes through.
                self.surface.request_redraw();
            }
        }

        outcome.control()
    }

    fn on_exit(&mut self) {
        self.save_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifex_canvas::Point;
    use artifex_engine::input::{KeyState, Modifiers};

    fn press(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        }
    }

    fn app_with_one_stroke() -> ArtifexApp {
        let stroke = Stroke::from_points([Point::new(0.0, 0.0), Point::new(4.0, 4.0)]);
        let mut app = ArtifexApp::new(StudioConfig::default(), BrushImage::solid_white(), vec![stroke]);
        app.take_redraw_request();
        app
    }

    #[test]
    fn save_key_schedules_one_frame_without_touching_strokes() {
        let mut app = app_with_one_stroke();
        let mut runtime = RuntimeCtx::default();

        let control = app.on_input(&press(Key::Char('s')), &InputState::default(), &mut runtime);

        assert_eq!(control, AppControl::Continue);
        assert!(app.snapshot_requested);
        assert!(app.take_redraw_request());
        assert!(!app.take_redraw_request());
        assert_eq!(app.surface.current_strokes().len(), 1);
    }

    #[test]
    fn clear_keys_empty_the_canvas() {
        for key in [Key::Char('c'), Key::Delete] {
            let mut app = app_with_one_stroke();
            let mut runtime = RuntimeCtx::default();
            app.on_input(&press(key), &InputState::default(), &mut runtime);

            assert!(app.surface.current_strokes().is_empty());
            assert!(app.take_redraw_request());
        }
    }

    #[test]
    fn escape_exits() {
        let mut app = app_with_one_stroke();
        let mut runtime = RuntimeCtx::default();
        let control = app.on_input(&press(Key::Escape), &InputState::default(), &mut runtime);
        assert_eq!(control, AppControl::Exit);
    }
}
