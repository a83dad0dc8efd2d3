use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{ensure, Result};
use clap::Parser;
use log::{info, warn};

use sprite_forge::batch::copy_sprites;
use sprite_forge::cli::{exit_status, init_logging};
use sprite_forge::config::{CANDIDATE_ANIMATIONS, DEFAULT_PATCH_TARGET};
use sprite_forge::{
    detect_frames, run_batch, ConfigPatcher, FsSpriteRepository, LayoutArgs, NormalizeMode,
    Normalizer, SpritePipeline, SpriteRepository,
};

/// Detect frame counts, normalize every sprite to 80x80 and patch the game's frame table
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Config {
    #[command(flatten)]
    layout: LayoutArgs,

    /// Markup file holding the `const maxFrames = {...};` block
    #[arg(long, default_value = DEFAULT_PATCH_TARGET)]
    config_file: PathBuf,
}

fn main() -> ExitCode {
    init_logging();
    let config = Config::parse();
    exit_status(run(&config).map(|()| true))
}

fn run(config: &Config) -> Result<()> {
    let repo = FsSpriteRepository::new();
    let layout = config.layout.layout();
    ensure!(
        layout.base_dir.is_dir(),
        "Asset directory {} does not exist",
        layout.base_dir.display()
    );

    info!("detecting animations");
    let frames = detect_frames(&repo, &layout, &CANDIDATE_ANIMATIONS);
    if frames.is_empty() {
        warn!("no animation detected");
        return Ok(());
    }

    let prefix = layout.sprite_prefix();
    let sprites = repo.list_pngs(&layout.base_dir, &prefix)?;
    if sprites.is_empty() {
        warn!("no {prefix}*.png sprite found");
    } else {
        info!("optimizing {} sprites", sprites.len());
        let optimized = layout.output_dir("optimized");
        let pipeline = SpritePipeline::new().with_normalizer(Normalizer::new(NormalizeMode::Fit));
        let summary = run_batch(&repo, &sprites, Some(&optimized), &pipeline);

        if summary.any_succeeded() {
            copy_sprites(&repo, &optimized, &layout.base_dir, &prefix)?;
        }
    }

    if ConfigPatcher::default().patch_file(&repo, &config.config_file, &frames)? {
        info!("game configuration updated, reload the game to see the changes");
    }
    Ok(())
}
