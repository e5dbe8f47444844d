//! Ring frames for tube meshing and parallel transport between them.
//!
//! A [`RingFrame`] pins down the zero-angle radial direction (`axis`) of one
//! cross-section ring. Each new ring inherits its axis from the previous ring
//! through the shortest-arc rotation between the two forward vectors, which
//! keeps the polygon from twisting along curved branches.

use glam::{Quat, Vec3};

/// Shortest-arc rotation taking unit vector `from` onto unit vector `to`.
///
/// Antiparallel inputs rotate by 180° about an arbitrary perpendicular axis.
#[inline]
pub fn shortest_arc(from: Vec3, to: Vec3) -> Quat {
    Quat::from_rotation_arc(from.normalize(), to.normalize())
}

/// Orientation record for a single emitted ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingFrame {
    /// Ring normal: the direction of growth at this ring.
    pub forward: Vec3,
    /// Unit radial direction at angle zero. Always perpendicular to `forward`.
    pub axis: Vec3,
}

impl RingFrame {
    /// Frame for a ring with no predecessor: forward is the local +Y of
    /// `orientation`, axis is its local +X.
    pub fn initial(orientation: Quat) -> Self {
        Self {
            forward: (orientation * Vec3::Y).normalize(),
            axis: (orientation * Vec3::X).normalize(),
        }
    }

    /// Frame for the next ring along `forward`, carrying this frame's axis
    /// across by parallel transport.
    pub fn transported(&self, forward: Vec3) -> Self {
        let forward = forward.normalize();
        let transport = shortest_arc(self.forward, forward);
        Self {
            forward,
            axis: (transport * self.axis).normalize(),
        }
    }

    /// Second in-plane basis vector, `forward × axis`.
    pub fn binormal(&self) -> Vec3 {
        self.forward.cross(self.axis).normalize()
    }

    /// Unit radial offset of vertex `index` on a ring of `segments` vertices.
    pub fn radial(&self, index: u32, segments: u32) -> Vec3 {
        let angle = index as f32 / segments as f32 * std::f32::consts::TAU;
        let (sin, cos) = angle.sin_cos();
        self.axis * cos + self.binormal() * sin
    }

    /// Returns true if `forward` is within the alignment threshold of this
    /// frame's forward vector (cosine of the angle between them).
    pub fn is_aligned_with(&self, forward: Vec3, threshold: f32) -> bool {
        self.forward.dot(forward.normalize()) >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_initial_frame_identity() {
        let frame = RingFrame::initial(Quat::IDENTITY);
        assert!((frame.forward - Vec3::Y).length() < EPS);
        assert!((frame.axis - Vec3::X).length() < EPS);
        // Y × X = -Z
        assert!((frame.binormal() - Vec3::NEG_Z).length() < EPS);
    }

    #[test]
    fn test_transport_straight_is_identity() {
        let frame = RingFrame::initial(Quat::IDENTITY);
        let next = frame.transported(Vec3::Y);
        assert!((next.axis - frame.axis).length() < EPS);
    }

    #[test]
    fn test_transport_keeps_axis_perpendicular() {
        let frame = RingFrame::initial(Quat::IDENTITY);
        let bent = Vec3::new(0.3, 0.8, -0.5).normalize();
        let next = frame.transported(bent);
        assert!(next.axis.dot(next.forward).abs() < EPS);
        assert!((next.axis.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_transport_has_no_roll() {
        // Bending in the plane spanned by forward and axis must keep the axis
        // in that plane; a roll would push it out along the binormal.
        let frame = RingFrame::initial(Quat::IDENTITY);
        let bent = Vec3::new(1.0, 1.0, 0.0).normalize();
        let next = frame.transported(bent);
        assert!(next.axis.z.abs() < EPS);
        assert!((next.axis - Vec3::new(1.0, -1.0, 0.0).normalize()).length() < EPS);
    }

    #[test]
    fn test_transport_antiparallel() {
        let frame = RingFrame::initial(Quat::IDENTITY);
        let next = frame.transported(Vec3::NEG_Y);
        assert!((next.forward - Vec3::NEG_Y).length() < EPS);
        assert!(next.axis.dot(next.forward).abs() < EPS);
    }

    #[test]
    fn test_radial_points_lie_on_unit_circle() {
        let frame = RingFrame::initial(Quat::from_rotation_z(0.4));
        for i in 0..8 {
            let r = frame.radial(i, 8);
            assert!((r.length() - 1.0).abs() < EPS);
            assert!(r.dot(frame.forward).abs() < EPS);
        }
        assert!((frame.radial(0, 8) - frame.axis).length() < EPS);
    }

    #[test]
    fn test_alignment_threshold() {
        let frame = RingFrame::initial(Quat::IDENTITY);
        assert!(frame.is_aligned_with(Vec3::Y, 0.999));
        let tilted = Quat::from_rotation_z(0.2) * Vec3::Y;
        assert!(!frame.is_aligned_with(tilted, 0.999));
    }
}
