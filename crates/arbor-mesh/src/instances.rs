//! Discrete branch instances: one transform per segment, for instanced
//! rendering of a unit cylinder or a flat cuboid.

use arbor_lsystem::{Anchor, Emitter, Segment};
use arbor_math::Bounds;
use glam::{Mat4, Quat, Vec3};

use crate::gradient::HeightGradient;

/// Instance count at which interpretation stops.
pub const DEFAULT_MAX_SEGMENTS: usize = 400_000;

/// Depth of the cuboid mesh before instance scaling.
pub const CUBOID_DEPTH: f32 = 0.01;

/// Shape the renderer should instance. Both shapes are scaled by
/// `(width, length, width)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InstanceShape {
    /// Unit cylinder along +Y.
    #[default]
    Cylinder,
    /// Unit square along +Y, [`CUBOID_DEPTH`] deep, for flat views. A
    /// scaled instance is `CUBOID_DEPTH * width` deep.
    Cuboid,
}

/// Transform and tags for one branch segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchInstance {
    pub center: Vec3,
    pub orientation: Quat,
    /// (width, length, width).
    pub scale: Vec3,
    /// y of the segment start, used for coloring.
    pub start_height: f32,
    /// Taper decay active for this segment.
    pub decay: f32,
}

impl BranchInstance {
    /// Model matrix for a unit shape centered on the origin.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation, self.center)
    }
}

/// All branch instances of one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BranchInstances {
    pub shape: InstanceShape,
    instances: Vec<BranchInstance>,
}

impl BranchInstances {
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BranchInstance> {
        self.instances.iter()
    }

    /// Per-instance colors from stored start heights. Cheap to call again
    /// after a color change; the interpreter is not involved.
    pub fn colors(&self, base: [f32; 3], tip: [f32; 3], bounds: Option<&Bounds>) -> Vec<[f32; 3]> {
        let gradient = HeightGradient::new(base, tip, bounds);
        self.instances
            .iter()
            .map(|i| gradient.color_at(i.start_height))
            .collect()
    }
}

/// [`Emitter`] that records one [`BranchInstance`] per segment.
#[derive(Debug)]
pub struct InstanceBuilder {
    instances: BranchInstances,
    max_segments: usize,
}

impl InstanceBuilder {
    pub fn new(shape: InstanceShape, max_segments: usize) -> Self {
        Self {
            instances: BranchInstances {
                shape,
                instances: Vec::new(),
            },
            max_segments,
        }
    }

    pub fn finish(self) -> BranchInstances {
        log::debug!(
            "Branch instances: {} ({:?})",
            self.instances.len(),
            self.instances.shape
        );
        self.instances
    }
}

impl Default for InstanceBuilder {
    fn default() -> Self {
        Self::new(InstanceShape::default(), DEFAULT_MAX_SEGMENTS)
    }
}

impl Emitter for InstanceBuilder {
    fn emit(&mut self, segment: &Segment, _from: Option<Anchor>) -> Option<Anchor> {
        self.instances.instances.push(BranchInstance {
            center: segment.midpoint(),
            orientation: segment.orientation,
            scale: Vec3::new(segment.width, segment.length, segment.width),
            start_height: segment.start.y,
            decay: segment.decay,
        });
        None
    }

    fn saturated(&self) -> bool {
        self.instances.len() >= self.max_segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_lsystem::{Constant, TurtleParams, interpret};

    fn build(s: &str, builder: &mut InstanceBuilder, params: &TurtleParams) {
        let symbols: Vec<char> = s.chars().collect();
        interpret(&symbols, params, builder, &mut Constant(0.5));
    }

    #[test]
    fn test_one_instance_per_segment() {
        let mut builder = InstanceBuilder::default();
        build("F[+F]G-F", &mut builder, &TurtleParams::default());
        assert_eq!(builder.finish().len(), 4);
    }

    #[test]
    fn test_instance_transform() {
        let params = TurtleParams {
            step_length: 2.0,
            base_width: 0.4,
            ..Default::default()
        };
        let mut builder = InstanceBuilder::default();
        build("FF", &mut builder, &params);
        let instances = builder.finish();
        let second = instances.iter().nth(1).unwrap();
        assert!((second.center - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-5);
        assert_eq!(second.scale, Vec3::new(0.4, 2.0, 0.4));
        assert_eq!(second.start_height, 2.0);
        assert_eq!(second.decay, 1.0);
    }

    #[test]
    fn test_cuboid_depth_scales_with_width() {
        let params = TurtleParams {
            base_width: 0.5,
            ..Default::default()
        };
        let mut builder = InstanceBuilder::new(InstanceShape::Cuboid, DEFAULT_MAX_SEGMENTS);
        build("F", &mut builder, &params);
        let instances = builder.finish();
        assert_eq!(instances.shape, InstanceShape::Cuboid);

        let instance = instances.iter().next().unwrap();
        assert_eq!(instance.scale, Vec3::new(0.5, 1.0, 0.5));
        // The depth factor lives in the mesh, so it applies once.
        let depth = instance.matrix().transform_vector3(Vec3::Z * CUBOID_DEPTH);
        assert!((depth.length() - CUBOID_DEPTH * 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_segment_cap() {
        let mut builder = InstanceBuilder::new(InstanceShape::Cylinder, 3);
        build("FFFFFF", &mut builder, &TurtleParams::default());
        assert_eq!(builder.finish().len(), 3);
    }

    #[test]
    fn test_recolor_from_heights() {
        let mut builder = InstanceBuilder::default();
        build("FFF", &mut builder, &TurtleParams::default());
        let instances = builder.finish();
        let bounds = Bounds::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0));
        let colors = instances.colors([0.0; 3], [1.0; 3], Some(&bounds));
        assert_eq!(colors, vec![[0.0; 3], [0.5; 3], [1.0; 3]]);
        let recolored = instances.colors([1.0; 3], [1.0; 3], Some(&bounds));
        assert!(recolored.iter().all(|c| *c == [1.0; 3]));
    }
}
