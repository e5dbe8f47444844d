//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;
use crate::config::{BranchShape, RenderMode};
use crate::error::ConfigError;

/// Arbor command-line arguments.
///
/// CLI values override settings loaded from `config.ron`. A preset is applied
/// first, so individual flags can adjust it.
#[derive(Parser, Debug, Default)]
#[command(name = "arbor", about = "L-system plant geometry generator")]
pub struct CliArgs {
    /// Start from a built-in preset (tree1, pine, fern, ...).
    #[arg(long)]
    pub preset: Option<String>,

    /// Axiom string.
    #[arg(long)]
    pub axiom: Option<String>,

    /// Rules, one `SYMBOL=REPLACEMENT` per line; `;` also separates rules.
    #[arg(long)]
    pub rules: Option<String>,

    /// Rewrite iterations.
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Rotation angle in degrees.
    #[arg(long)]
    pub angle: Option<f32>,

    /// Angle variance in degrees.
    #[arg(long)]
    pub variance: Option<f32>,

    /// Step length.
    #[arg(long)]
    pub step: Option<f32>,

    /// Base width.
    #[arg(long)]
    pub width: Option<f32>,

    /// Taper factor.
    #[arg(long)]
    pub taper: Option<f32>,

    /// Leaf scale multiplier.
    #[arg(long)]
    pub leaf_scale: Option<f32>,

    /// Only place leaves at branch tips.
    #[arg(long)]
    pub tips_only: Option<bool>,

    /// Geometry output mode.
    #[arg(long, value_enum)]
    pub mode: Option<RenderMode>,

    /// Instance shape in discrete mode.
    #[arg(long, value_enum)]
    pub shape: Option<BranchShape>,

    /// Random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) -> Result<(), ConfigError> {
        if let Some(ref preset) = args.preset {
            self.apply_preset(preset)?;
        }
        if let Some(ref axiom) = args.axiom {
            self.grammar.axiom = axiom.clone();
        }
        if let Some(ref rules) = args.rules {
            self.grammar.rules = rules.replace(';', "\n");
        }
        if let Some(n) = args.iterations {
            self.grammar.iterations = n;
        }
        if let Some(a) = args.angle {
            self.turtle.angle_deg = a;
        }
        if let Some(v) = args.variance {
            self.turtle.variance_deg = v;
        }
        if let Some(s) = args.step {
            self.turtle.step_length = s;
        }
        if let Some(w) = args.width {
            self.turtle.base_width = w;
        }
        if let Some(t) = args.taper {
            self.turtle.taper = t;
        }
        if let Some(s) = args.leaf_scale {
            self.turtle.leaf_scale = s;
        }
        if let Some(t) = args.tips_only {
            self.turtle.tips_only = t;
        }
        if let Some(mode) = args.mode {
            self.render.mode = mode;
        }
        if let Some(shape) = args.shape {
            self.render.shape = shape;
        }
        if let Some(seed) = args.seed {
            self.turtle.seed = Some(seed);
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        Ok(())
    }
}
