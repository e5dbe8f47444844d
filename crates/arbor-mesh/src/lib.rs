//! Geometry emitters for the turtle interpreter: a continuous tube mesh with
//! parallel-transported rings, and per-segment branch instances.

pub mod gradient;
pub mod instances;
pub mod tube;

pub use gradient::HeightGradient;
pub use instances::{
    BranchInstance, BranchInstances, CUBOID_DEPTH, DEFAULT_MAX_SEGMENTS, InstanceBuilder,
    InstanceShape,
};
pub use tube::{
    DEFAULT_MAX_VERTICES, DEFAULT_RADIAL_SEGMENTS, PIVOT_ALIGNMENT, TubeBuilder, TubeMesh,
    TubeVertex,
};
