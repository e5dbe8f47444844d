//! `arbor`: generate one plant and report what was built.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p arbor-app -- --preset pine --seed 7`.

use std::path::PathBuf;

use arbor_app::{CameraFit, GenerationRequest, Generator, Geometry, auto_scale};
use arbor_config::{CliArgs, Config, default_config_dir};
use clap::Parser;
use tracing::{error, info, warn};

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from(".arbor"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    if let Err(e) = config.apply_cli_overrides(&args) {
        eprintln!("{e}");
        std::process::exit(2);
    }

    let log_dir = config_dir.join("logs");
    arbor_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let request = match GenerationRequest::from_config(&config) {
        Ok(request) => request,
        Err(e) => {
            error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let generator = Generator::new();
    let Some(output) = generator.generate(&request) else {
        warn!("Generator busy, nothing produced");
        return;
    };

    let stats = &output.stats;
    info!("{stats}");
    info!(
        "String: {} symbols after {} iterations",
        stats.string_length,
        stats.iterations_run
    );
    if stats.string_truncated {
        warn!("String length cap reached, expansion stopped early");
    }
    match &output.geometry {
        Geometry::Continuous(mesh) => info!(
            "Tube mesh: {} rings ({} pivots), {} vertices, {} triangles",
            stats.rings,
            stats.pivots,
            mesh.vertex_count(),
            mesh.triangle_count()
        ),
        Geometry::Discrete(instances) => {
            info!("Instances: {} ({:?})", instances.len(), instances.shape)
        }
    }
    if stats.geometry_truncated {
        warn!("Geometry cap reached, output is partial");
    }
    if let Some(seed) = output.seed {
        info!("Seed: {seed}");
    }

    let Some(bounds) = output.bounds else {
        return;
    };
    info!("Bounds: min {:?}, max {:?}", bounds.min, bounds.max);

    let scale = auto_scale(
        Some(&bounds),
        config.render.auto_scale,
        config.render.target_height,
    );
    let fit = CameraFit::from_bounds(&bounds, scale, config.render.fov_y_deg.to_radians());
    info!(
        "Display scale {scale:.3}, camera target {:?}, distance {:.2}, far plane {:.1}",
        fit.target,
        fit.distance,
        fit.far
    );
}
