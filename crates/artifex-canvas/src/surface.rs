use crate::redraw::{RedrawFlag, RedrawScheduler};
use crate::store::StrokeStore;
use crate::stroke::Stroke;

/// The drawing surface: exclusive owner of the stroke store and of the
/// scheduler that turns mutations into frames.
///
/// Hosts pass it by `&mut` to [`InputCapture`](crate::InputCapture) and by
/// `&` to [`FrameRenderer`](crate::FrameRenderer); nothing else holds it.
#[derive(Debug, Default)]
pub struct DrawingSurface<R: RedrawScheduler = RedrawFlag> {
    store: StrokeStore,
    redraw: R,
}

impl<R: RedrawScheduler> DrawingSurface<R> {
    pub fn new(redraw: R) -> Self {
        Self {
            store: StrokeStore::new(),
            redraw,
        }
    }

    #[inline]
    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    #[inline]
    pub(crate) fn store_mut(&mut self) -> &mut StrokeStore {
        &mut self.store
    }

    #[inline]
    pub fn redraw(&self) -> &R {
        &self.redraw
    }

    #[inline]
    pub fn redraw_mut(&mut self) -> &mut R {
        &mut self.redraw
    }

    #[inline]
    pub fn request_redraw(&mut self) {
        self.redraw.request_redraw();
    }

    /// Discards all strokes, including an in-progress one, and schedules a frame.
    pub fn clear_canvas(&mut self) {
        log::debug!("clearing canvas ({} strokes)", self.store.len());
        self.store.clear();
        self.redraw.request_redraw();
    }

    /// Replaces the completed strokes with `strokes` (session restore).
    pub fn load_initial_strokes(&mut self, strokes: impl IntoIterator<Item = Stroke>) {
        self.store.replace_completed(strokes);
        log::info!("loaded {} strokes", self.store.completed().len());
        self.redraw.request_redraw();
    }

    /// Copies every stroke in draw order, including the one in progress.
    pub fn current_strokes(&self) -> Vec<Stroke> {
        self.store.snapshot_strokes().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::plan_frame;
    use crate::stroke::Point;
    use artifex_engine::coords::Viewport;

    fn drag(surface: &mut DrawingSurface, points: &[(f32, f32)]) {
        let store = surface.store_mut();
        let mut it = points.iter().map(|&p| Point::from(p));
        if let Some(first) = it.next() {
            store.begin_stroke(first);
        }
        for p in it {
            store.append_point(p);
        }
        store.commit_stroke();
    }

    const INPUT: Viewport = Viewport::new(100.0, 100.0);
    const TARGET: Viewport = Viewport::new(100.0, 100.0);

    #[test]
    fn two_strokes_give_two_draws_in_order() {
        let mut surface: DrawingSurface = DrawingSurface::default();
        drag(&mut surface, &[(0.0, 0.0), (1.0, 1.0)]);
        drag(&mut surface, &[(5.0, 5.0), (6.0, 6.0), (7.0, 7.0)]);

        let plan = plan_frame(surface.store().snapshot_strokes(), INPUT, TARGET);
        assert_eq!(plan.draws.len(), 2);
        assert_eq!(plan.draws[0].stroke_index, 0);
        assert_eq!(plan.draws[0].vertices.len(), 2);
        assert_eq!(plan.draws[1].stroke_index, 1);
        assert_eq!(plan.draws[1].vertices.len(), 3);
    }

    #[test]
    fn single_point_gesture_is_stored_but_not_drawn() {
        let mut surface: DrawingSurface = DrawingSurface::default();
        drag(&mut surface, &[(50.0, 50.0)]);

        assert_eq!(surface.store().completed().len(), 1);
        let plan = plan_frame(surface.store().snapshot_strokes(), INPUT, TARGET);
        assert!(plan.draws.is_empty());
        assert_eq!(plan.strokes, 1);
    }

    #[test]
    fn clear_canvas_empties_and_requests_frame() {
        let mut surface: DrawingSurface = DrawingSurface::default();
        drag(&mut surface, &[(0.0, 0.0), (1.0, 1.0)]);
        surface.redraw_mut().take();

        surface.clear_canvas();
        assert_eq!(surface.store().snapshot_strokes().count(), 0);
        assert!(surface.redraw_mut().take());
        assert!(plan_frame(surface.store().snapshot_strokes(), INPUT, TARGET).draws.is_empty());
    }

    #[test]
    fn current_strokes_include_in_progress() {
        let mut surface: DrawingSurface = DrawingSurface::default();
        surface.load_initial_strokes(vec![Stroke::from_points([
            Point::new(0.0, 0.0),
            Point::new(2.0, 2.0),
        ])]);
        surface.store_mut().begin_stroke(Point::new(9.0, 9.0));

        let strokes = surface.current_strokes();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[1].points(), &[Point::new(9.0, 9.0)]);
    }
}
