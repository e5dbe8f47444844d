//! Display-scale and camera framing for a generated plant.

use arbor_math::Bounds;
use glam::Vec3;

/// Minimum far-plane distance.
pub const MIN_FAR_PLANE: f32 = 2000.0;

/// Padding applied to the distance at which the plant exactly fills the view.
pub const DISTANCE_PADDING: f32 = 1.5;

/// Uniform scale that brings the plant to `target_height`.
///
/// Returns 1 when disabled, when there are no bounds, or when the plant has
/// no height.
pub fn auto_scale(bounds: Option<&Bounds>, enabled: bool, target_height: f32) -> f32 {
    match bounds {
        Some(b) if enabled && b.size().y > 0.0 => target_height / b.size().y,
        _ => 1.0,
    }
}

/// Camera placement that frames the whole plant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFit {
    /// Point to orbit around: the scaled bounds center.
    pub target: Vec3,
    /// Distance from `target`.
    pub distance: f32,
    /// Far clip plane.
    pub far: f32,
}

impl CameraFit {
    /// Fit for `bounds` after scaling by `scale`, with vertical field of view
    /// `fov_y` in radians.
    pub fn from_bounds(bounds: &Bounds, scale: f32, fov_y: f32) -> Self {
        let max_dim = bounds.max_dimension() * scale;
        let distance = (max_dim / 2.0 / (fov_y / 2.0).tan()).abs() * DISTANCE_PADDING;
        Self {
            target: bounds.center() * scale,
            distance,
            far: MIN_FAR_PLANE.max(distance * 5.0),
        }
    }

    /// Front view: level with the target, looking down -Z.
    pub fn front_position(&self) -> Vec3 {
        Vec3::new(0.0, self.target.y, self.distance)
    }

    /// Keeps the viewing direction from `current` to the target and moves
    /// to the fitted distance.
    pub fn reframe(&self, current: Vec3, previous_target: Vec3) -> Vec3 {
        let direction = (current - previous_target)
            .try_normalize()
            .unwrap_or(Vec3::Z);
        self.target + direction * self.distance
    }
}
