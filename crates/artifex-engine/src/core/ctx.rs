use winit::window::{Window, WindowId};

use crate::coords::{Extent, Viewport};
use crate::device::Gpu;
use crate::input::InputState;
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::window::RuntimeCtx;

use super::app::AppControl;

pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Inner size in logical pixels: the space input positions are reported in.
    pub fn logical_size(&self) -> Viewport {
        let size = self
            .window
            .inner_size()
            .to_logical::<f64>(self.window.scale_factor());
        Viewport::new(size.width as f32, size.height as f32)
    }
}

/// How a [`FrameCtx::render`] call ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Presented,
    /// No drawable this time (minimized, outdated, timeout); the next redraw retries.
    Skipped,
    /// The surface is unusable.
    Fatal,
}

impl FrameOutcome {
    #[inline]
    pub fn control(self) -> AppControl {
        if self == FrameOutcome::Fatal {
            AppControl::Exit
        } else {
            AppControl::Continue
        }
    }
}

/// Handed to [`App::on_frame`](super::App::on_frame) for each `RedrawRequested`.
///
/// `'a` spans the callback; `'w` is the window borrow held by [`Gpu`].
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub frame_index: u64,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Runs one frame: acquire a drawable, clear it to `clear`, let `draw`
    /// record its passes, then submit and present.
    ///
    /// `draw` is skipped when no drawable can be acquired.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> FrameOutcome
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err.clone());
                if !action.is_recoverable() {
                    log::error!("surface lost for good: {err}");
                    return FrameOutcome::Fatal;
                }
                log::debug!("frame {} skipped ({err}, {action:?})", self.frame_index);
                return FrameOutcome::Skipped;
            }
        };

        let (width, height) = frame.size();
        let clear = clear.for_target(self.gpu.surface_format()).to_wgpu();
        frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("artifex frame clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.window.logical_size(),
            Extent::new(width, height),
        );
        draw(
            &rctx,
            &mut RenderTarget {
                encoder: &mut frame.encoder,
                color_view: &frame.view,
            },
        );

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);
        FrameOutcome::Presented
    }

    /// Context for GPU work outside [`render`](Self::render), such as readbacks.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        let size = self.gpu.size();
        RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.window.logical_size(),
            Extent::new(size.width, size.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fatal_frames_exit() {
        assert_eq!(FrameOutcome::Presented.control(), AppControl::Continue);
        assert_eq!(FrameOutcome::Skipped.control(), AppControl::Continue);
        assert_eq!(FrameOutcome::Fatal.control(), AppControl::Exit);
    }
}
