use std::process::ExitCode;

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use log::info;

use sprite_forge::analyze::find_sprite_issues;
use sprite_forge::cli::{exit_status, init_logging};
use sprite_forge::{run_batch, FsSpriteRepository, LayoutArgs, SpritePipeline, SpriteRepository};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    /// Remove white and light-gray residue, crop to content, binary alpha, sharpen
    WhiteResidue,
    /// Remove corner colors and grays, vote out soft edge pixels, boost contrast
    NeighborVote,
}

impl Strategy {
    fn pipeline(self) -> SpritePipeline {
        match self {
            Self::WhiteResidue => SpritePipeline::white_residue(),
            Self::NeighborVote => SpritePipeline::neighbor_vote(),
        }
    }
}

/// Find sprites with white residue or border content and write cleaned copies to `cleaned/`
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Config {
    #[command(flatten)]
    layout: LayoutArgs,

    #[arg(long, value_enum, default_value_t = Strategy::WhiteResidue)]
    strategy: Strategy,
}

fn main() -> ExitCode {
    init_logging();
    let config = Config::parse();
    exit_status(run(&config).map(|()| true))
}

fn run(config: &Config) -> Result<()> {
    let repo = FsSpriteRepository::new();
    let layout = config.layout.layout();
    let prefix = layout.sprite_prefix();
    ensure!(
        layout.base_dir.is_dir(),
        "Asset directory {} does not exist",
        layout.base_dir.display()
    );

    info!("analysing current sprites");
    let issues = find_sprite_issues(&repo, &layout.base_dir, &prefix)?;
    if issues.is_empty() {
        info!("sprites are already clean, nothing to do");
        return Ok(());
    }

    let sprites = repo.list_pngs(&layout.base_dir, &prefix)?;
    info!(
        "cleaning {} sprites with {:?}",
        sprites.len(),
        config.strategy
    );

    let cleaned = layout.output_dir("cleaned");
    let summary = run_batch(&repo, &sprites, Some(&cleaned), &config.strategy.pipeline());
    if summary.all_succeeded() {
        info!(
            "all sprites cleaned; copy {} over {} to use them",
            cleaned.display(),
            layout.base_dir.display()
        );
    }
    Ok(())
}
