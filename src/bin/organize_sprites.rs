use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{ensure, Result};
use clap::Parser;
use log::info;

use sprite_forge::cli::{exit_status, init_logging};
use sprite_forge::config::DEFAULT_BASE_DIR;
use sprite_forge::organize::{log_structure, organize_sprites, SpriteCatalog};
use sprite_forge::FsSpriteRepository;

/// Move loose sprites into `<character>/<basic|combat|special>/` folders
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Config {
    /// Directory holding the loose sprites
    #[arg(long, default_value = DEFAULT_BASE_DIR)]
    base_dir: PathBuf,
}

fn main() -> ExitCode {
    init_logging();
    let config = Config::parse();
    exit_status(run(&config).map(|()| true))
}

fn run(config: &Config) -> Result<()> {
    ensure!(
        config.base_dir.is_dir(),
        "Asset directory {} does not exist",
        config.base_dir.display()
    );

    let repo = FsSpriteRepository::new();
    let catalog = SpriteCatalog::default();

    info!("organizing sprites by character");
    let report = organize_sprites(&repo, &config.base_dir, &catalog)?;
    info!("{} moved, {} skipped", report.moved(), report.skipped());

    log_structure(&repo, &config.base_dir, &catalog);
    Ok(())
}
