//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::presets::PRESETS;

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Axiom, rules and iteration count.
    pub grammar: GrammarConfig,
    /// Turtle interpretation settings.
    pub turtle: TurtleConfig,
    /// Output geometry and coloring.
    pub render: RenderConfig,
    /// Safety caps.
    pub limits: LimitsConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Grammar configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrammarConfig {
    /// Initial symbol string.
    pub axiom: String,
    /// Newline-separated `SYMBOL=REPLACEMENT` lines.
    pub rules: String,
    /// Rewrite passes.
    pub iterations: u32,
}

/// Turtle configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TurtleConfig {
    /// Rotation angle in degrees.
    pub angle_deg: f32,
    /// Uniform random perturbation of each rotation, in degrees.
    pub variance_deg: f32,
    /// Length of one forward-draw.
    pub step_length: f32,
    /// Width at the root.
    pub base_width: f32,
    /// Width factor applied by `!`.
    pub taper: f32,
    /// Leaf size multiplier.
    pub leaf_scale: f32,
    /// Only place leaves at branch tips.
    pub tips_only: bool,
    /// Random seed. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
}

/// Geometry output style.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderMode {
    /// One connected tube mesh.
    #[default]
    Continuous,
    /// One instance per segment.
    Discrete,
}

/// Shape hint for discrete instances.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum BranchShape {
    #[default]
    Cylinder,
    /// Flat box, for 2D views.
    Cuboid,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Tube mesh or instances.
    pub mode: RenderMode,
    /// Instance shape in discrete mode.
    pub shape: BranchShape,
    /// Vertices per tube ring.
    pub radial_segments: u32,
    /// Color at the lowest point, `#rrggbb`.
    pub base_color: String,
    /// Color at the highest point.
    pub tip_color: String,
    /// Leaf color.
    pub leaf_color: String,
    /// Scale the plant so its height matches `target_height`.
    pub auto_scale: bool,
    /// Height after auto-scaling.
    pub target_height: f32,
    /// Vertical field of view used for camera fitting, in degrees.
    pub fov_y_deg: f32,
}

/// Output size caps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Expansion stops once the string exceeds this many symbols.
    pub max_string_length: usize,
    /// Discrete mode stops after this many segments.
    pub max_segments: usize,
    /// Continuous mode stops after this many vertices.
    pub max_vertices: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for GrammarConfig {
    fn default() -> Self {
        let preset = &PRESETS[0];
        Self {
            axiom: preset.axiom.to_string(),
            rules: preset.rules.to_string(),
            iterations: preset.iterations,
        }
    }
}

impl Default for TurtleConfig {
    fn default() -> Self {
        let preset = &PRESETS[0];
        Self {
            angle_deg: preset.angle_deg,
            variance_deg: preset.variance_deg,
            step_length: preset.step_length,
            base_width: preset.base_width,
            taper: preset.taper,
            leaf_scale: 1.0,
            tips_only: false,
            seed: None,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        let preset = &PRESETS[0];
        Self {
            mode: RenderMode::Continuous,
            shape: BranchShape::Cylinder,
            radial_segments: 8,
            base_color: preset.base_color.to_string(),
            tip_color: preset.tip_color.to_string(),
            leaf_color: preset.leaf_color.to_string(),
            auto_scale: true,
            target_height: 60.0,
            fov_y_deg: 60.0,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_string_length: 1_000_000,
            max_segments: 400_000,
            max_vertices: 10_000_000,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for arbor, if the platform has one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("arbor"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-reads `config.ron`: returns `Some(new_config)` if it differs from
    /// `self`, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
