//! Configuration for the arbor plant generator.
//!
//! Settings persist to disk as `config.ron` and can be overridden from the
//! command line. A library of named presets covers the stock plants.

mod cli;
mod color;
mod config;
mod error;
mod presets;

pub use cli::CliArgs;
pub use color::{Palette, parse_hex_color};
pub use config::{
    BranchShape, Config, DebugConfig, GrammarConfig, LimitsConfig, RenderConfig, RenderMode,
    TurtleConfig, default_config_dir,
};
pub use error::ConfigError;
pub use presets::{PRESETS, Preset, find_preset};
