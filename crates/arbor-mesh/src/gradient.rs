//! Height-based vertex and instance coloring.

use arbor_math::Bounds;
use glam::Vec3;

/// Linear blend from `base` at the lowest point to `tip` at the highest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightGradient {
    base: Vec3,
    tip: Vec3,
    min_y: f32,
    range_y: f32,
}

impl HeightGradient {
    /// Gradient spanning the vertical extent of `bounds`. Empty bounds or a
    /// zero vertical extent fall back to a unit range starting at 0.
    pub fn new(base: [f32; 3], tip: [f32; 3], bounds: Option<&Bounds>) -> Self {
        let (min_y, range_y) = match bounds {
            Some(b) => (b.min.y, b.size().y),
            None => (0.0, 1.0),
        };
        Self {
            base: Vec3::from(base),
            tip: Vec3::from(tip),
            min_y,
            range_y: if range_y > 0.0 { range_y } else { 1.0 },
        }
    }

    /// Normalized height of `y`, clamped to `[0, 1]`.
    pub fn t(&self, y: f32) -> f32 {
        ((y - self.min_y) / self.range_y).clamp(0.0, 1.0)
    }

    /// Color at height `y`.
    pub fn color_at(&self, y: f32) -> [f32; 3] {
        self.base.lerp(self.tip, self.t(y)).to_array()
    }
}
