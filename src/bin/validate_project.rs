use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::{info, warn};

use sprite_forge::cli::{exit_status, init_logging};
use sprite_forge::config::EXPECTED_ANIMATIONS;
use sprite_forge::{FrameSet, FsSpriteRepository, LayoutArgs, Validator};

const REQUIRED_FILES: [&str; 3] = ["animated.html", "sprites.html", "index.html"];
const OPTIONAL_FILES: [&str; 3] = ["README.md", "ANIMATIONS.md", ".github/copilot-instructions.md"];
const OTHER_CHARACTERS: [&str; 3] = ["warrior", "robot", "mage"];
const OTHER_ANIMATIONS: [&str; 6] = ["idle", "walk", "jump", "attack", "hurt", "icon"];

/// Full pre-session check: pages, animation frames, other characters and markup
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Config {
    #[command(flatten)]
    layout: LayoutArgs,

    /// Root of the game project, where the HTML pages live
    #[arg(long, default_value = ".")]
    project_root: PathBuf,
}

fn main() -> ExitCode {
    init_logging();
    let config = Config::parse();
    exit_status(run(&config))
}

fn run(config: &Config) -> Result<bool> {
    let repo = FsSpriteRepository::new();
    let expected: FrameSet = EXPECTED_ANIMATIONS.into_iter().collect();

    let mut validator = Validator::new(config.layout.layout(), expected)
        .with_project_root(&config.project_root)
        .with_other_characters(&OTHER_CHARACTERS, &OTHER_ANIMATIONS)
        .with_project_size();
    for file in REQUIRED_FILES {
        validator = validator.with_main_file(file, true).with_markup_file(file);
    }
    for file in OPTIONAL_FILES {
        validator = validator.with_main_file(file, false);
    }

    let report = validator.run(&repo);
    report.log_summary();

    if report.passed() {
        info!("project validated, multi-frame animations are ready");
    } else {
        warn!("validation incomplete, check the messages above");
    }
    Ok(report.passed())
}
