use serde::{Deserialize, Serialize};

/// A position on the input surface, in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    #[inline]
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// Ordered points captured from one continuous drag.
///
/// Append-only: points are only ever pushed while the stroke is in progress,
/// and the store hands out shared references once it is committed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Starts a stroke at `first`.
    pub fn new(first: Point) -> Self {
        Self { points: vec![first] }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A line strip needs at least two vertices.
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_is_not_drawable() {
        let s = Stroke::new(Point::new(1.0, 1.0));
        assert_eq!(s.len(), 1);
        assert!(!s.is_drawable());
    }

    #[test]
    fn serializes_as_plain_point_array() {
        let s = Stroke::from_points([Point::new(0.0, 0.0), Point::new(10.0, 2.5)]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"[{"x":0.0,"y":0.0},{"x":10.0,"y":2.5}]"#);
        let back: Stroke = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
