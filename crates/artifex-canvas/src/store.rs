use crate::stroke::{Point, Stroke};

/// Completed strokes plus the stroke currently being drawn.
///
/// Invariants:
/// - `completed` is in insertion order, which is also draw order (earliest
///   stroke at the bottom).
/// - at most one stroke is in progress.
/// - committed strokes are never mutated; `clear` is the only removal.
#[derive(Debug, Default)]
pub struct StrokeStore {
    completed: Vec<Stroke>,
    current: Option<Stroke>,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new in-progress stroke at `point`.
    ///
    /// Returns `false` (and changes nothing) if a stroke is already in progress.
    pub fn begin_stroke(&mut self, point: Point) -> bool {
        if self.current.is_some() {
            log::debug!("begin_stroke ignored: a stroke is already in progress");
            return false;
        }
        self.current = Some(Stroke::new(point));
        true
    }

    /// Appends `point` to the in-progress stroke; no-op without one.
    pub fn append_point(&mut self, point: Point) -> bool {
        match self.current.as_mut() {
            Some(stroke) => {
                stroke.push(point);
                true
            }
            None => false,
        }
    }

    /// Moves the in-progress stroke, whatever its length, into the completed list.
    pub fn commit_stroke(&mut self) -> bool {
        match self.current.take() {
            Some(stroke) => {
                log::trace!(
                    "stroke {} committed with {} points",
                    self.completed.len(),
                    stroke.len()
                );
                self.completed.push(stroke);
                true
            }
            None => false,
        }
    }

    /// Discards every stroke, including the one in progress.
    pub fn clear(&mut self) {
        self.completed.clear();
        self.current = None;
    }

    /// Replaces the completed strokes, leaving any in-progress stroke alone.
    pub fn replace_completed(&mut self, strokes: impl IntoIterator<Item = Stroke>) {
        self.completed = strokes.into_iter().collect();
    }

    /// All strokes in draw order: completed first, the in-progress stroke last.
    pub fn snapshot_strokes(&self) -> impl Iterator<Item = &Stroke> + '_ {
        self.completed.iter().chain(self.current.iter())
    }

    #[inline]
    pub fn completed(&self) -> &[Stroke] {
        &self.completed
    }

    #[inline]
    pub fn current(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    #[inline]
    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    /// Number of strokes returned by [`snapshot_strokes`](Self::snapshot_strokes).
    #[inline]
    pub fn len(&self) -> usize {
        self.completed.len() + usize::from(self.current.is_some())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    fn snapshot(store: &StrokeStore) -> Vec<Vec<Point>> {
        store.snapshot_strokes().map(|s| s.points().to_vec()).collect()
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn gesture_yields_one_completed_stroke_in_order() {
        let mut store = StrokeStore::new();
        assert!(store.begin_stroke(p(0.0, 0.0)));
        for i in 1..=5 {
            assert!(store.append_point(p(i as f32, 2.0 * i as f32)));
        }
        assert!(store.commit_stroke());

        assert!(store.current().is_none());
        assert_eq!(store.completed().len(), 1);
        let expected: Vec<Point> = std::iter::once(p(0.0, 0.0))
            .chain((1..=5).map(|i| p(i as f32, 2.0 * i as f32)))
            .collect();
        assert_eq!(store.completed()[0].points(), expected.as_slice());
    }

    #[test]
    fn duplicate_begin_keeps_existing_stroke() {
        let mut store = StrokeStore::new();
        store.begin_stroke(p(1.0, 1.0));
        assert!(!store.begin_stroke(p(9.0, 9.0)));
        assert_eq!(store.current().unwrap().points(), &[p(1.0, 1.0)]);
    }

    #[test]
    fn append_and_commit_without_stroke_are_noops() {
        let mut store = StrokeStore::new();
        assert!(!store.append_point(p(1.0, 1.0)));
        assert!(!store.commit_stroke());
        assert!(store.is_empty());
    }

    #[test]
    fn single_point_stroke_is_kept() {
        let mut store = StrokeStore::new();
        store.begin_stroke(p(4.0, 4.0));
        store.commit_stroke();
        assert_eq!(snapshot(&store), vec![vec![p(4.0, 4.0)]]);
    }

    // ── snapshot ──────────────────────────────────────────────────────────

    #[test]
    fn snapshot_puts_current_stroke_last() {
        let mut store = StrokeStore::new();
        store.begin_stroke(p(0.0, 0.0));
        store.commit_stroke();
        store.begin_stroke(p(1.0, 1.0));
        store.append_point(p(2.0, 2.0));

        assert_eq!(
            snapshot(&store),
            vec![vec![p(0.0, 0.0)], vec![p(1.0, 1.0), p(2.0, 2.0)]]
        );
        assert_eq!(store.len(), 2);
    }

    // ── clear ─────────────────────────────────────────────────────────────

    #[test]
    fn clear_empties_everything() {
        let mut store = StrokeStore::new();
        store.begin_stroke(p(0.0, 0.0));
        store.commit_stroke();
        store.begin_stroke(p(5.0, 5.0));
        store.clear();

        assert_eq!(store.snapshot_strokes().count(), 0);
        assert!(!store.is_drawing());
        // A fresh gesture works after clearing mid-stroke.
        assert!(store.begin_stroke(p(1.0, 1.0)));
    }

    #[test]
    fn replace_completed_keeps_current() {
        let mut store = StrokeStore::new();
        store.begin_stroke(p(9.0, 9.0));
        store.replace_completed(vec![Stroke::from_points([p(0.0, 0.0), p(1.0, 0.0)])]);
        assert_eq!(store.completed().len(), 1);
        assert!(store.is_drawing());
    }
}
