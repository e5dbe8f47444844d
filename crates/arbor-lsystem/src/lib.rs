//! L-system grammar expansion and turtle interpretation.
//!
//! The pipeline is [`Grammar::expand`] followed by [`interpret`], which walks
//! the expanded string and hands every forward-draw to an [`Emitter`].
//! Randomness is injected through [`RandomSource`] so runs are reproducible.

pub mod grammar;
pub mod jitter;
pub mod leaf;
pub mod scan;
pub mod symbol;
pub mod taper;
pub mod turtle;

pub use grammar::{DEFAULT_MAX_LENGTH, Expansion, Grammar, LString};
pub use jitter::{Constant, RandomSource, RngSource, jittered};
pub use leaf::{LeafInstance, LeafInstances, LeafPlacement, LeafTransform};
pub use symbol::{Axis, Command};
pub use taper::TaperRun;
pub use turtle::{
    Anchor, BranchStack, Emitter, Interpretation, Segment, TurtleParams, TurtleState, interpret,
};
