//! Leaf placement and leaf instance storage.

use glam::{Mat4, Quat, Vec3};

use crate::jitter::RandomSource;
use crate::scan::has_growth_ahead;

/// Leaf size relative to the step length before the leaf-scale multiplier.
pub const LEAF_BASE_FRACTION: f32 = 0.5;

/// Position, rotation and uniform scale of one leaf quad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeafTransform {
    /// Attachment point.
    pub position: Vec3,
    /// Turtle orientation plus random twist.
    pub rotation: Quat,
    /// Uniform scale.
    pub scale: f32,
}

impl LeafTransform {
    /// Model matrix for instanced rendering.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.position,
        )
    }
}

/// A leaf with its unscaled base transform kept alongside the current one,
/// so leaf size can change without re-running the interpreter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeafInstance {
    /// Transform at multiplier 1.
    pub base: LeafTransform,
    /// Transform at the current multiplier.
    pub current: LeafTransform,
}

impl LeafInstance {
    fn scaled(base: LeafTransform, multiplier: f32) -> Self {
        Self {
            base,
            current: LeafTransform {
                scale: base.scale * multiplier,
                ..base
            },
        }
    }
}

/// All leaves of one generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafInstances {
    instances: Vec<LeafInstance>,
    multiplier: f32,
}

impl LeafInstances {
    /// Empty list using `multiplier` for new leaves.
    pub fn new(multiplier: f32) -> Self {
        Self {
            instances: Vec::new(),
            multiplier,
        }
    }

    /// Appends a leaf from its base transform.
    pub fn push(&mut self, base: LeafTransform) {
        self.instances.push(LeafInstance::scaled(base, self.multiplier));
    }

    /// Recomputes every current transform from its base.
    pub fn rescale(&mut self, multiplier: f32) {
        self.multiplier = multiplier;
        for leaf in &mut self.instances {
            *leaf = LeafInstance::scaled(leaf.base, multiplier);
        }
    }

    /// The active multiplier.
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if no leaves were placed.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Leaves in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &LeafInstance> {
        self.instances.iter()
    }
}

/// Leaf placement rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeafPlacement {
    /// Configured step length, the leaf size reference.
    pub step_length: f32,
    /// Only place leaves where no growth follows in the same branch.
    pub tips_only: bool,
}

impl LeafPlacement {
    /// Base transform for the leaf symbol at `index`, or `None` if the
    /// tips-only filter suppresses it. Twist samples are drawn only for
    /// emitted leaves.
    pub fn place<R: RandomSource + ?Sized>(
        &self,
        symbols: &[char],
        index: usize,
        position: Vec3,
        orientation: Quat,
        rng: &mut R,
    ) -> Option<LeafTransform> {
        if self.tips_only && has_growth_ahead(symbols, index + 1) {
            return None;
        }
        let twist_x = rng.next_unit();
        let twist_y = rng.next_unit();
        let twist = Quat::from_rotation_x(twist_x) * Quat::from_rotation_y(twist_y);
        Some(LeafTransform {
            position,
            rotation: orientation * twist,
            scale: self.step_length * LEAF_BASE_FRACTION,
        })
    }
}
