//! Turtle interpreter.
//!
//! Walks an expanded string once, maintaining a [`TurtleState`] and a
//! [`BranchStack`]. Geometry is not built here: every forward-draw is handed
//! to an [`Emitter`], which decides whether it becomes tube rings or a branch
//! instance. Leaves and bounds are collected directly.

use std::f32::consts::PI;

use arbor_math::BoundsTracker;
use glam::{Quat, Vec3};

use crate::jitter::{RandomSource, jittered};
use crate::leaf::{LeafInstances, LeafPlacement};
use crate::symbol::Command;
use crate::taper::TaperRun;

/// Opaque handle an emitter uses to find the geometry a branch continues
/// from (the last ring, in continuous mode).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Anchor(pub u32);

/// Complete turtle state. Snapshots of this are what `[` saves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurtleState {
    /// Current position.
    pub position: Vec3,
    /// Current orientation. Local +Y is the heading.
    pub orientation: Quat,
    /// Distance covered by one forward-draw.
    pub step: f32,
    /// Current branch width.
    pub width: f32,
    /// Active gradual-taper run.
    pub taper: TaperRun,
    /// Geometry the next segment connects to.
    pub anchor: Option<Anchor>,
}

impl TurtleState {
    /// State at the origin, growing along world +Y.
    pub fn new(step: f32, width: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            step,
            width,
            taper: TaperRun::INACTIVE,
            anchor: None,
        }
    }

    /// Heading in world space.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Rotates about a local axis (post-multiplied).
    pub fn rotate_local(&mut self, axis: Vec3, angle: f32) {
        let turned = self.orientation * Quat::from_axis_angle(axis, angle);
        self.orientation = turned.normalize();
    }
}

/// LIFO of saved turtle states.
#[derive(Clone, Debug, Default)]
pub struct BranchStack {
    states: Vec<TurtleState>,
}

impl BranchStack {
    pub fn push(&mut self, state: TurtleState) {
        self.states.push(state);
    }

    /// Most recent snapshot, or `None` on an unmatched `]`.
    pub fn pop(&mut self) -> Option<TurtleState> {
        self.states.pop()
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.states.len()
    }
}

/// One forward-draw, as seen by an emitter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
    pub orientation: Quat,
    pub length: f32,
    /// Width after this segment's decay.
    pub width: f32,
    /// Width before this segment's decay.
    pub start_width: f32,
    /// Decay applied to this segment (1 outside a gradual run).
    pub decay: f32,
}

impl Segment {
    /// Heading of the segment.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Point halfway along the segment.
    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }
}

/// Receives geometry from the interpreter.
pub trait Emitter {
    /// Called once before interpretation with the initial state. Returns the
    /// anchor of any root geometry.
    fn begin(&mut self, _state: &TurtleState) -> Option<Anchor> {
        None
    }

    /// Records one segment continuing from `from`. Returns the anchor the
    /// next segment on this branch should continue from.
    fn emit(&mut self, segment: &Segment, from: Option<Anchor>) -> Option<Anchor>;

    /// Returns true once the emitter's output cap is reached.
    fn saturated(&self) -> bool;
}

/// Interpreter parameters. Angles are in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurtleParams {
    pub angle: f32,
    pub variance: f32,
    pub step_length: f32,
    pub base_width: f32,
    pub taper: f32,
    pub leaf_scale: f32,
    pub tips_only: bool,
}

impl Default for TurtleParams {
    fn default() -> Self {
        Self {
            angle: 25f32.to_radians(),
            variance: 0.0,
            step_length: 1.0,
            base_width: 0.5,
            taper: 0.7,
            leaf_scale: 1.0,
            tips_only: false,
        }
    }
}

/// Everything the interpreter produces apart from emitter output.
#[derive(Clone, Debug)]
pub struct Interpretation {
    pub leaves: LeafInstances,
    pub bounds: BoundsTracker,
    /// Forward-draws handed to the emitter.
    pub segments: usize,
    /// Deepest branch nesting reached.
    pub max_depth: usize,
    /// True if the emitter cap ended interpretation before the string end.
    pub stopped_early: bool,
}

/// Interprets `symbols`, feeding segments to `emitter`.
pub fn interpret<E, R>(
    symbols: &[char],
    params: &TurtleParams,
    emitter: &mut E,
    rng: &mut R,
) -> Interpretation
where
    E: Emitter + ?Sized,
    R: RandomSource + ?Sized,
{
    let mut state = TurtleState::new(params.step_length, params.base_width);
    state.anchor = emitter.begin(&state);

    let mut stack = BranchStack::default();
    let mut bounds = BoundsTracker::new();
    bounds.include(state.position);

    let placement = LeafPlacement {
        step_length: params.step_length,
        tips_only: params.tips_only,
    };
    let mut leaves = LeafInstances::new(params.leaf_scale);
    let mut segments = 0usize;
    let mut max_depth = 0usize;
    let mut stopped_early = false;

    for (index, &symbol) in symbols.iter().enumerate() {
        match Command::from_symbol(symbol) {
            Command::Forward => {
                if state.taper.needs_scan() {
                    state.taper = TaperRun::begin(symbols, index, params.taper);
                }
                let start_width = state.width;
                let decay = if state.taper.is_active() {
                    state.taper.advance()
                } else {
                    1.0
                };
                state.width *= decay;

                let end = state.position + state.forward() * state.step;
                let segment = Segment {
                    start: state.position,
                    end,
                    orientation: state.orientation,
                    length: state.step,
                    width: state.width,
                    start_width,
                    decay,
                };
                state.anchor = emitter.emit(&segment, state.anchor);
                state.position = end;
                bounds.include(end);
                segments += 1;

                if emitter.saturated() {
                    stopped_early = index + 1 < symbols.len();
                    if stopped_early {
                        log::warn!(
                            "Geometry cap reached after {segments} segments, {} symbols skipped",
                            symbols.len() - index - 1
                        );
                    }
                    break;
                }
            }
            Command::Leaf => {
                if let Some(leaf) =
                    placement.place(symbols, index, state.position, state.orientation, rng)
                {
                    leaves.push(leaf);
                }
            }
            Command::Rotate { axis, positive } => {
                let angle = jittered(params.angle, params.variance, rng);
                state.rotate_local(axis.local(), if positive { angle } else { -angle });
            }
            Command::TurnAround => state.rotate_local(Vec3::Z, PI),
            Command::TaperMark => {
                if state.taper.terminates_at(index) {
                    state.taper = TaperRun::INACTIVE;
                } else {
                    state.width *= params.taper;
                }
            }
            Command::Push => {
                stack.push(state);
                max_depth = max_depth.max(stack.depth());
                state.taper = TaperRun::INACTIVE;
            }
            Command::Pop => match stack.pop() {
                Some(saved) => state = saved,
                // Unmatched: the scope being scanned changes, drop the cached scan.
                None => state.taper.open_scope = false,
            },
            Command::Noop => {}
        }
    }

    log::debug!(
        "Interpreted {} symbols: {segments} segments, {} leaves, depth {max_depth}",
        symbols.len(),
        leaves.len()
    );

    Interpretation {
        leaves,
        bounds,
        segments,
        max_depth,
        stopped_early,
    }
}
