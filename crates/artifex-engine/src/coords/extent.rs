/// Size of a GPU texture or drawable in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn to_viewport(self) -> super::Viewport {
        super::Viewport::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_axis_is_empty() {
        assert!(Extent::new(0, 10).is_empty());
        assert!(Extent::new(10, 0).is_empty());
        assert!(!Extent::new(1, 1).is_empty());
    }

    #[test]
    fn converts_to_float_viewport() {
        let v = Extent::new(640, 480).to_viewport();
        assert_eq!(v.width, 640.0);
        assert_eq!(v.height, 480.0);
        assert!(v.is_valid());
    }
}
