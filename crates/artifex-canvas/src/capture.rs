//! Input capture: raw pointer/touch events → stroke store mutations.

use artifex_engine::input::{
    InputEvent, MouseButton, MouseButtonState, PointerButtonEvent, TouchEvent, TouchPhase,
};

use crate::redraw::RedrawScheduler;
use crate::stroke::Point;
use crate::surface::DrawingSurface;

/// A single-stream drawing gesture.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Gesture {
    Begin(Point),
    Move(Point),
    End,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum GestureSource {
    Mouse,
    Touch(u64),
}

/// Maps engine input events to gestures.
///
/// Only one source drives a gesture at a time: the left mouse button or the
/// first touch contact. Events from other sources are dropped until it ends.
#[derive(Debug, Default)]
pub struct GestureTracker {
    source: Option<GestureSource>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    pub fn translate(&mut self, event: &InputEvent) -> Option<Gesture> {
        match *event {
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x,
                y,
                ..
            }) => match (state, self.source) {
                (MouseButtonState::Pressed, None) => {
                    self.source = Some(GestureSource::Mouse);
                    Some(Gesture::Begin(Point::new(x, y)))
                }
                (MouseButtonState::Released, Some(GestureSource::Mouse)) => {
                    self.source = None;
                    Some(Gesture::End)
                }
                _ => None,
            },

            InputEvent::PointerMoved(m) if self.source == Some(GestureSource::Mouse) => {
                Some(Gesture::Move(Point::new(m.x, m.y)))
            }

            InputEvent::Touch(TouchEvent { id, phase, x, y }) => {
                let owns = self.source == Some(GestureSource::Touch(id));
                match phase {
                    TouchPhase::Started if self.source.is_none() => {
                        self.source = Some(GestureSource::Touch(id));
                        Some(Gesture::Begin(Point::new(x, y)))
                    }
                    TouchPhase::Moved if owns => Some(Gesture::Move(Point::new(x, y))),
                    TouchPhase::Ended | TouchPhase::Cancelled if owns => {
                        self.source = None;
                        Some(Gesture::End)
                    }
                    _ => {
                        log::trace!("touch {id} {phase:?} ignored");
                        None
                    }
                }
            }

            InputEvent::Focused(false) if self.source.is_some() => {
                log::debug!("focus lost mid-gesture; ending stroke");
                self.source = None;
                Some(Gesture::End)
            }

            _ => None,
        }
    }
}

/// Drives a [`DrawingSurface`] from gestures.
///
/// Holds no reference to the surface; callers pass it on every call.
#[derive(Debug, Default)]
pub struct InputCapture {
    tracker: GestureTracker,
}

impl InputCapture {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    /// Translates `event` and applies the resulting gesture, if any.
    pub fn handle_event<R: RedrawScheduler>(
        &mut self,
        surface: &mut DrawingSurface<R>,
        event: &InputEvent,
    ) -> Option<Gesture> {
        let gesture = self.tracker.translate(event)?;
        self.apply(surface, gesture);
        Some(gesture)
    }

    pub fn apply<R: RedrawScheduler>(&mut self, surface: &mut DrawingSurface<R>, gesture: Gesture) {
        match gesture {
            Gesture::Begin(p) => {
                self.begin(surface, p);
            }
            Gesture::Move(p) => self.extend(surface, p),
            Gesture::End => self.end(surface),
        }
    }

    /// Starts a stroke at `point`. Returns `false` if one is already active.
    pub fn begin<R: RedrawScheduler>(&mut self, surface: &mut DrawingSurface<R>, point: Point) -> bool {
        let started = surface.store_mut().begin_stroke(point);
        if started {
            surface.request_redraw();
        }
        started
    }

    pub fn extend<R: RedrawScheduler>(&mut self, surface: &mut DrawingSurface<R>, point: Point) {
        surface.store_mut().append_point(point);
        surface.request_redraw();
    }

    pub fn end<R: RedrawScheduler>(&mut self, surface: &mut DrawingSurface<R>) {
        surface.store_mut().commit_stroke();
        surface.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::plan_frame;
    use artifex_engine::coords::Viewport;
    use artifex_engine::input::{Modifiers, PointerMoveEvent};

    fn mouse(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    fn touch(id: u64, phase: TouchPhase, x: f32, y: f32) -> InputEvent {
        InputEvent::Touch(TouchEvent { id, phase, x, y })
    }

    // ── tracker ───────────────────────────────────────────────────────────

    #[test]
    fn hover_without_press_is_ignored() {
        let mut t = GestureTracker::new();
        assert_eq!(t.translate(&moved(3.0, 4.0)), None);
    }

    #[test]
    fn mouse_drag_maps_to_begin_move_end() {
        let mut t = GestureTracker::new();
        assert_eq!(
            t.translate(&mouse(MouseButtonState::Pressed, 1.0, 2.0)),
            Some(Gesture::Begin(Point::new(1.0, 2.0)))
        );
        assert_eq!(t.translate(&moved(3.0, 4.0)), Some(Gesture::Move(Point::new(3.0, 4.0))));
        assert_eq!(
            t.translate(&mouse(MouseButtonState::Released, 3.0, 4.0)),
            Some(Gesture::End)
        );
        assert!(!t.is_active());
    }

    #[test]
    fn secondary_touch_is_ignored() {
        let mut t = GestureTracker::new();
        assert!(matches!(
            t.translate(&touch(1, TouchPhase::Started, 0.0, 0.0)),
            Some(Gesture::Begin(_))
        ));
        assert_eq!(t.translate(&touch(2, TouchPhase::Started, 9.0, 9.0)), None);
        assert_eq!(t.translate(&touch(2, TouchPhase::Moved, 8.0, 8.0)), None);
        assert_eq!(t.translate(&touch(2, TouchPhase::Ended, 8.0, 8.0)), None);
        assert!(t.is_active());
        assert_eq!(t.translate(&touch(1, TouchPhase::Ended, 1.0, 1.0)), Some(Gesture::End));
    }

    #[test]
    fn touch_blocks_mouse_until_it_ends() {
        let mut t = GestureTracker::new();
        t.translate(&touch(7, TouchPhase::Started, 0.0, 0.0));
        assert_eq!(t.translate(&mouse(MouseButtonState::Pressed, 5.0, 5.0)), None);
        assert_eq!(t.translate(&moved(5.0, 5.0)), None);
    }

    #[test]
    fn cancel_and_focus_loss_end_the_gesture() {
        let mut t = GestureTracker::new();
        t.translate(&touch(1, TouchPhase::Started, 0.0, 0.0));
        assert_eq!(t.translate(&touch(1, TouchPhase::Cancelled, 0.0, 0.0)), Some(Gesture::End));

        t.translate(&mouse(MouseButtonState::Pressed, 0.0, 0.0));
        assert_eq!(t.translate(&InputEvent::Focused(false)), Some(Gesture::End));
        assert_eq!(t.translate(&InputEvent::Focused(false)), None);
    }

    // ── capture ───────────────────────────────────────────────────────────

    #[test]
    fn drag_produces_one_stroke_with_every_point() {
        let mut surface: DrawingSurface = DrawingSurface::default();
        let mut capture = InputCapture::new();

        capture.handle_event(&mut surface, &mouse(MouseButtonState::Pressed, 0.0, 0.0));
        for i in 1..=4 {
            capture.handle_event(&mut surface, &moved(i as f32, 0.0));
        }
        capture.handle_event(&mut surface, &mouse(MouseButtonState::Released, 4.0, 0.0));

        let store = surface.store();
        assert!(store.current().is_none());
        assert_eq!(store.completed().len(), 1);
        let xs: Vec<f32> = store.completed()[0].points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn second_begin_is_rejected() {
        let mut surface: DrawingSurface = DrawingSurface::default();
        let mut capture = InputCapture::new();
        assert!(capture.begin(&mut surface, Point::new(0.0, 0.0)));
        surface.redraw_mut().take();

        assert!(!capture.begin(&mut surface, Point::new(1.0, 1.0)));
        assert!(!surface.redraw().is_pending());
    }

    #[test]
    fn every_extend_requests_a_coalesced_redraw() {
        let mut surface: DrawingSurface = DrawingSurface::default();
        let mut capture = InputCapture::new();
        capture.begin(&mut surface, Point::new(0.0, 0.0));
        for i in 0..5 {
            capture.extend(&mut surface, Point::new(i as f32, 1.0));
        }

        assert_eq!(surface.redraw().requests(), 6);
        assert!(surface.redraw_mut().take());
        assert!(!surface.redraw_mut().take());
    }

    #[test]
    fn end_without_gesture_changes_nothing() {
        let mut surface: DrawingSurface = DrawingSurface::default();
        let mut capture = InputCapture::new();
        capture.end(&mut surface);
        capture.extend(&mut surface, Point::new(1.0, 1.0));
        assert!(surface.store().is_empty());
    }

    // ── frames ────────────────────────────────────────────────────────────

    fn gesture<R: RedrawScheduler>(
        capture: &mut InputCapture,
        surface: &mut DrawingSurface<R>,
        points: &[(f32, f32)],
    ) {
        let mut it = points.iter().map(|&p| Point::from(p));
        if let Some(first) = it.next() {
            capture.begin(surface, first);
        }
        for p in it {
            capture.extend(surface, p);
        }
        capture.end(surface);
    }

    #[test]
    fn drawn_l_shape_scales_into_a_larger_target() {
        let mut surface: DrawingSurface = DrawingSurface::default();
        let mut capture = InputCapture::new();
        gesture(&mut capture, &mut surface, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);

        let plan = plan_frame(
            surface.store().snapshot_strokes(),
            Viewport::new(100.0, 100.0),
            Viewport::new(200.0, 200.0),
        );
        assert_eq!(plan.draws.len(), 1);
        let positions: Vec<[f32; 2]> = plan.draws[0].vertices.iter().map(|v| v.pos).collect();
        assert_eq!(positions, vec![[0.0, 0.0], [20.0, 0.0], [20.0, 20.0]]);
    }

    #[test]
    fn clear_after_two_gestures_draws_nothing() {
        let mut surface: DrawingSurface = DrawingSurface::default();
        let mut capture = InputCapture::new();
        gesture(&mut capture, &mut surface, &[(0.0, 0.0), (5.0, 5.0)]);
        gesture(&mut capture, &mut surface, &[(10.0, 10.0), (20.0, 5.0), (30.0, 30.0)]);
        assert_eq!(surface.store().snapshot_strokes().count(), 2);

        surface.clear_canvas();

        assert_eq!(surface.store().snapshot_strokes().count(), 0);
        let vp = Viewport::new(100.0, 100.0);
        let plan = plan_frame(surface.store().snapshot_strokes(), vp, vp);
        assert!(plan.draws.is_empty());
        assert_eq!(plan.strokes, 0);
    }

    #[test]
    fn tap_is_kept_but_never_drawn() {
        let mut surface: DrawingSurface = DrawingSurface::default();
        let mut capture = InputCapture::new();
        assert!(capture.begin(&mut surface, Point::new(42.0, 17.0)));
        capture.end(&mut surface);

        assert_eq!(surface.store().snapshot_strokes().count(), 1);
        let vp = Viewport::new(100.0, 100.0);
        let plan = plan_frame(surface.store().snapshot_strokes(), vp, vp);
        assert!(plan.draws.is_empty());
        assert_eq!(plan.strokes, 1);
    }
}
