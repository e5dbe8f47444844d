//! Generation pipeline for arbor.
//!
//! Ties the grammar expander, the turtle interpreter and the geometry
//! builders together behind a [`Generator`], and computes display scale and
//! camera framing for the result.

pub mod fit;
pub mod generator;

#[cfg(test)]
mod tests;

pub use fit::{CameraFit, auto_scale};
pub use generator::{
    GenerationContext, GenerationOutput, GenerationRequest, GenerationStats, Generator, Geometry,
    GeometryMode, Limits,
};
