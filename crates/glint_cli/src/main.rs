mod args;
mod config;
mod scenes;

use anyhow::{Context, Result};
use args::CliArgs;
use clap::Parser;
use config::ConfigFile;
use glint_renderer::{render, render_parallel, Camera, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };

    let seed = args
        .seed
        .or(file.render.map(|r| r.seed))
        .unwrap_or_default();

    let start = Instant::now();
    let scenes::Scene {
        world,
        camera,
        sky,
        render: preset_config,
    } = scenes::build(args.scene, seed).context("Failed to build scene")?;
    let stats = world.stats();
    log::info!(
        "Built {:?} in {:?} (BVH: {} nodes, depth {})",
        args.scene,
        start.elapsed(),
        stats.nodes,
        stats.depth
    );

    let mut camera = match file.camera {
        Some(settings) => Camera::from_settings(settings),
        None => camera,
    };
    if let Some(width) = args.width {
        let settings = camera.settings();
        let aspect = settings.image_width as f32 / settings.image_height as f32;
        camera = camera.with_aspect_ratio(width, aspect);
    }
    camera.initialize().context("Invalid camera")?;

    let config = apply_overrides(file.render.unwrap_or(preset_config), &args, seed);
    config.validate().context("Invalid render settings")?;

    let start = Instant::now();
    let image = if args.single_threaded {
        let mut rng = StdRng::seed_from_u64(config.seed);
        render(&camera, &world, &sky, &config, &mut rng)?
    } else {
        render_parallel(&camera, &world, &sky, &config)?
    };
    log::info!("Render finished in {:?}", start.elapsed());

    image
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}

/// Command line flags win over the config file and the preset.
fn apply_overrides(mut config: RenderConfig, args: &CliArgs, seed: u64) -> RenderConfig {
    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(depth) = args.depth {
        config.max_depth = depth;
    }
    config.seed = seed;
    config
}
