use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::{info, warn};

use sprite_forge::cli::{exit_status, init_logging};
use sprite_forge::{
    run_batch, FsSpriteRepository, LayoutArgs, NormalizeMode, Normalizer, SpritePipeline,
    SpriteRepository,
};

/// Bring every skill sprite to 80x80, overwriting the originals
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Config {
    #[command(flatten)]
    layout: LayoutArgs,
}

fn main() -> ExitCode {
    init_logging();
    let config = Config::parse();
    exit_status(run(&config).map(|()| true))
}

fn run(config: &Config) -> Result<()> {
    let repo = FsSpriteRepository::new();
    let skills_dir = config.layout.layout().skills_dir;
    if !skills_dir.is_dir() {
        warn!("{} not found", skills_dir.display());
        return Ok(());
    }

    let sprites = repo.list_pngs(&skills_dir, "")?;
    if sprites.is_empty() {
        warn!("no PNG sprite in {}", skills_dir.display());
        return Ok(());
    }
    info!("resizing {} skill sprites", sprites.len());

    let pipeline = SpritePipeline::new().with_normalizer(Normalizer::new(NormalizeMode::Fit));
    run_batch(&repo, &sprites, None, &pipeline);
    Ok(())
}
