use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::info;

use sprite_forge::cli::{exit_status, init_logging};
use sprite_forge::config::EXPECTED_ANIMATIONS;
use sprite_forge::{FrameSet, FsSpriteRepository, LayoutArgs, Validator};

/// Check that every expected animation frame exists and is 80x80
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Config {
    #[command(flatten)]
    layout: LayoutArgs,
}

fn main() -> ExitCode {
    init_logging();
    let config = Config::parse();
    exit_status(run(&config))
}

fn run(config: &Config) -> Result<bool> {
    let repo = FsSpriteRepository::new();
    let layout = config.layout.layout();
    let expected: FrameSet = EXPECTED_ANIMATIONS.into_iter().collect();

    info!("checking {} animations", layout.character);
    let report = Validator::new(layout, expected).run(&repo);
    report.log_summary();

    Ok(report.passed())
}
