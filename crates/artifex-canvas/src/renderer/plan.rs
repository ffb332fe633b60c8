use artifex_engine::coords::Viewport;

use crate::geometry::{build_vertices, StrokeVertex};
use crate::stroke::Stroke;

/// One line-strip draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDraw {
    /// Position of the stroke in the snapshot it was planned from.
    pub stroke_index: usize,
    pub vertices: Vec<StrokeVertex>,
}

/// Everything a frame will draw, in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePlan {
    pub draws: Vec<StrokeDraw>,
    /// Strokes considered, drawn or not.
    pub strokes: usize,
}

impl FramePlan {
    pub fn vertex_count(&self) -> usize {
        self.draws.iter().map(|d| d.vertices.len()).sum()
    }
}

/// Builds the draw list for `strokes`: one draw per stroke that produced
/// vertices, in snapshot order. Strokes with empty geometry are skipped.
pub fn plan_frame<'a>(
    strokes: impl IntoIterator<Item = &'a Stroke>,
    input: Viewport,
    target: Viewport,
) -> FramePlan {
    let mut plan = FramePlan::default();
    for (stroke_index, stroke) in strokes.into_iter().enumerate() {
        plan.strokes += 1;
        let vertices = build_vertices(stroke, input, target);
        if vertices.is_empty() {
            continue;
        }
        plan.draws.push(StrokeDraw { stroke_index, vertices });
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Point;

    fn stroke(n: usize) -> Stroke {
        Stroke::from_points((0..n).map(|i| Point::new(i as f32, i as f32)))
    }

    const VP: Viewport = Viewport::new(64.0, 64.0);

    #[test]
    fn undrawable_strokes_are_skipped_but_counted() {
        let strokes = [stroke(3), stroke(1), stroke(0), stroke(2)];
        let plan = plan_frame(&strokes, VP, VP);

        assert_eq!(plan.strokes, 4);
        let indices: Vec<usize> = plan.draws.iter().map(|d| d.stroke_index).collect();
        assert_eq!(indices, vec![0, 3]);
        assert_eq!(plan.vertex_count(), 5);
    }

    #[test]
    fn zero_input_plans_nothing() {
        let strokes = [stroke(4)];
        let plan = plan_frame(&strokes, Viewport::new(0.0, 0.0), VP);
        assert!(plan.draws.is_empty());
    }

    #[test]
    fn empty_snapshot_is_empty_plan() {
        let plan = plan_frame(std::iter::empty(), VP, VP);
        assert_eq!(plan, FramePlan::default());
    }
}
