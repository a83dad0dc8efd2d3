use std::process::ExitCode;

use anyhow::{ensure, Result};
use clap::Parser;
use log::{info, warn};

use sprite_forge::cli::{exit_status, init_logging};
use sprite_forge::config::CornerKeyConfig;
use sprite_forge::traits::file_name;
use sprite_forge::{
    run_batch, BackgroundStrategy, FsSpriteRepository, LayoutArgs, NormalizeMode, Normalizer,
    SpritePipeline, SpriteRepository,
};

/// Key out the corner background of numbered sprites and write 80x80 copies to `processed/`
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Config {
    #[command(flatten)]
    layout: LayoutArgs,

    /// Per-channel distance to the corner color that still counts as background
    #[arg(long, default_value_t = CornerKeyConfig::TOLERANCE)]
    tolerance: u8,
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

    let sprites: Vec<_> = repo
        .list_pngs(&layout.base_dir, &layout.sprite_prefix())?
        .into_iter()
        .filter(|path| file_name(path).chars().any(|c| c.is_ascii_digit()))
        .collect();

    if sprites.is_empty() {
        warn!("no numbered {} sprite found", layout.character);
        return Ok(());
    }
    info!("processing {} {} sprites", sprites.len(), layout.character);

    let strategy = BackgroundStrategy::CornerKey(CornerKeyConfig {
        tolerance: config.tolerance,
        ..CornerKeyConfig::default()
    });
    let pipeline = SpritePipeline::new()
        .with_background(strategy)
        .with_normalizer(Normalizer::new(NormalizeMode::Stretch));

    let output_dir = layout.output_dir("processed");
    let summary = run_batch(&repo, &sprites, Some(&output_dir), &pipeline);
    if summary.any_succeeded() {
        info!("sprites saved in {}", output_dir.display());
    }
    Ok(())
}
