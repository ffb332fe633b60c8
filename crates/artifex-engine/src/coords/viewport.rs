use super::Extent;

/// Surface size in floating-point pixels.
///
/// Used both for the logical input surface and, via [`Extent::to_viewport`],
/// for the physical render target when converting positions between the two.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Returns the viewport scaled by `k` on both axes.
    #[inline]
    pub fn scaled(self, k: f32) -> Self {
        Self::new(self.width * k, self.height * k)
    }
}

impl From<Extent> for Viewport {
    #[inline]
    fn from(e: Extent) -> Self {
        e.to_viewport()
    }
}
