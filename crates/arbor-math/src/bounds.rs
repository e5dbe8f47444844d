use glam::Vec3;

/// Axis-aligned bounding box in f32 model space.
///
/// Invariant: min.x <= max.x, min.y <= max.y, min.z <= max.z.
/// Zero extent on any axis is legal; callers dividing by [`Bounds::size`]
/// must check for it themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Minimum corner of the bounding box.
    pub min: Vec3,
    /// Maximum corner of the bounding box.
    pub max: Vec3,
}

impl Bounds {
    /// Create bounds from two corners. Components are sorted so that
    /// min <= max on every axis.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Zero-extent bounds around a single point.
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Grow the bounds to include `p`.
    pub fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Returns the center point.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the size along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest of the three extents.
    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }
}

/// Running min/max accumulator over every position the turtle visits.
///
/// Starts empty; [`BoundsTracker::bounds`] reports `None` until the first
/// point is included.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundsTracker {
    bounds: Option<Bounds>,
}

impl BoundsTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates a position.
    pub fn include(&mut self, p: Vec3) {
        match &mut self.bounds {
            Some(b) => b.include(p),
            None => self.bounds = Some(Bounds::from_point(p)),
        }
    }

    /// Current extents, if any point has been included.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Returns true if nothing has been included yet.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }
}
