use winit::dpi::PhysicalSize;

/// Viewport rectangle in physical pixels.
///
/// The canvas always renders into the full surface, so `x`/`y` stay at the
/// origin in practice; they exist to mirror the render pass API.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport covering the whole surface.
    #[inline]
    pub fn full(size: PhysicalSize<u32>) -> Self {
        Self::new(0.0, 0.0, size.width as f32, size.height as f32)
    }

    /// Whether the viewport covers exactly a surface of `size`.
    pub fn covers(self, size: PhysicalSize<u32>) -> bool {
        self == Self::full(size)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_viewport_matches_surface() {
        let size = PhysicalSize::new(1920, 1080);
        let vp = Viewport::full(size);
        assert_eq!(vp, Viewport::new(0.0, 0.0, 1920.0, 1080.0));
        assert!(vp.covers(size));
        assert!(!vp.covers(PhysicalSize::new(1920, 1079)));
    }

    #[test]
    fn zero_sized_surface_is_invalid() {
        assert!(!Viewport::full(PhysicalSize::new(0, 600)).is_valid());
        assert!(Viewport::full(PhysicalSize::new(1, 1)).is_valid());
    }
}
