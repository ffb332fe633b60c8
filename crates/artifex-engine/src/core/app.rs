use crate::input::{InputEvent, InputState};
use crate::render::RenderCtx;
use crate::window::RuntimeCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// All callbacks run on the event-loop thread, so input handling and frame
/// rendering never overlap.
pub trait App {
    /// Called once after the window and its GPU context exist, before the
    /// first frame. Returning an error aborts the runtime.
    fn on_surface_ready(&mut self, ctx: &RenderCtx<'_>) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called for every translated input event, before it is folded into `input`.
    fn on_input(
        &mut self,
        event: &InputEvent,
        input: &InputState,
        runtime: &mut RuntimeCtx,
    ) -> AppControl {
        let _ = (event, input, runtime);
        AppControl::Continue
    }

    /// Polled once per event batch; returning `true` schedules one redraw.
    ///
    /// Implementations should clear their pending flag here so that any number
    /// of mutations between two frames results in a single frame.
    fn take_redraw_request(&mut self) -> bool {
        false
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once before the event loop exits (close request or `Exit`).
    fn on_exit(&mut self) {}
}
