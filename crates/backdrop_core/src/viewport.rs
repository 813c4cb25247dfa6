//! Viewport geometry

/// Size of the rendering container in CSS/logical pixels.
///
/// Hosts may report zero or negative sizes while a container is collapsed;
/// such sizes are kept as-is and flagged by [`ViewportSize::is_degenerate`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when nothing can be drawn at this size
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0) || !self.width.is_finite() || !self.height.is_finite()
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Half the diagonal, i.e. the distance from the center to a corner
    pub fn half_diagonal(&self) -> f32 {
        (self.width * self.width + self.height * self.height).sqrt() / 2.0
    }

    /// Width over height, `None` when degenerate
    pub fn aspect(&self) -> Option<f32> {
        (!self.is_degenerate()).then(|| self.width / self.height)
    }

    /// Whole-pixel size for surface configuration, `None` when degenerate
    pub fn pixel_size(&self) -> Option<(u32, u32)> {
        if self.is_degenerate() {
            return None;
        }
        let w = self.width.round().max(1.0) as u32;
        let h = self.height.round().max(1.0) as u32;
        Some((w, h))
    }
}

impl From<(u32, u32)> for ViewportSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f32, height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_negative_sizes_are_degenerate() {
        assert!(ViewportSize::new(0.0, 600.0).is_degenerate());
        assert!(ViewportSize::new(800.0, -1.0).is_degenerate());
        assert!(ViewportSize::new(f32::NAN, 600.0).is_degenerate());
        assert!(ViewportSize::new(f32::INFINITY, 600.0).is_degenerate());
        assert!(!ViewportSize::new(800.0, 600.0).is_degenerate());
    }

    #[test]
    fn aspect_and_pixels_require_valid_size() {
        assert_eq!(ViewportSize::new(0.0, 600.0).aspect(), None);
        assert_eq!(ViewportSize::new(0.0, 600.0).pixel_size(), None);
        assert_eq!(ViewportSize::new(800.0, 400.0).aspect(), Some(2.0));
        assert_eq!(ViewportSize::new(799.6, 0.4).pixel_size(), Some((800, 1)));
    }

    #[test]
    fn half_diagonal_of_3_4_5() {
        assert_eq!(ViewportSize::new(6.0, 8.0).half_diagonal(), 5.0);
    }
}
