//! Bounding boxes and ring frames shared by the Arbor turtle interpreter and mesh builders.

mod bounds;
mod frame;

pub use bounds::{Bounds, BoundsTracker};
pub use frame::{RingFrame, shortest_arc};
