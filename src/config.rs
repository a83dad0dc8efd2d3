use clap::Args;
use std::path::{Path, PathBuf};

/// Edge length of every finished sprite.
pub const TARGET_SIZE: u32 = 80;

/// Highest frame index probed per animation.
pub const MAX_FRAMES: u32 = 9;

pub const DEFAULT_BASE_DIR: &str = "./assets/characters";
pub const DEFAULT_SKILLS_DIR: &str = "skills";
pub const DEFAULT_CHARACTER: &str = "ninja";

/// Candidate animations in probing order. `special` lives under the skills directory.
pub const CANDIDATE_ANIMATIONS: [&str; 6] = ["idle", "walk", "jump", "attack", "hurt", "special"];
pub const SKILL_ANIMATION: &str = "special";

/// Frame counts a complete ninja asset set must provide.
pub const EXPECTED_ANIMATIONS: [(&str, u32); 5] =
    [("idle", 4), ("walk", 6), ("jump", 4), ("attack", 4), ("hurt", 2)];

pub const CONFIG_MARKER: &str = "const maxFrames = {";
pub const CONFIG_CLOSING: &str = "};";
pub const DEFAULT_PATCH_TARGET: &str = "./stable.html";

/// Thresholds for the three pixel predicates used on skill sprites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicThresholds {
    /// Blue must exceed this to count as a blue/cyan backdrop.
    pub blue_min: u8,
    /// Blue must beat both red and green by more than this.
    pub blue_dominance: u8,
    /// Every channel above this is near-white.
    pub white_min: u8,
    /// Every channel above this, with small spread, is light gray.
    pub gray_min: u8,
    /// Pairwise channel difference must stay below this for gray.
    pub gray_spread: u8,
}

impl HeuristicThresholds {
    pub const BLUE_MIN: u8 = 150;
    pub const BLUE_DOMINANCE: u8 = 50;
    pub const WHITE_MIN: u8 = 240;
    pub const GRAY_MIN: u8 = 200;
    pub const GRAY_SPREAD: u8 = 30;
}

impl Default for HeuristicThresholds {
    fn default() -> Self {
        Self {
            blue_min: Self::BLUE_MIN,
            blue_dominance: Self::BLUE_DOMINANCE,
            white_min: Self::WHITE_MIN,
            gray_min: Self::GRAY_MIN,
            gray_spread: Self::GRAY_SPREAD,
        }
    }
}

/// Corner color keying with a center-crop fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerKeyConfig {
    /// Inclusive per-channel distance to the corner color.
    pub tolerance: u8,
    /// Below this share of opaque pixels the keying is considered failed.
    pub min_opaque_ratio: f64,
    /// Border share discarded on each side by the fallback.
    pub margin_ratio: f64,
}

impl CornerKeyConfig {
    pub const TOLERANCE: u8 = 30;
    pub const MIN_OPAQUE_RATIO: f64 = 0.10;
    pub const MARGIN_RATIO: f64 = 0.15;
}

impl Default for CornerKeyConfig {
    fn default() -> Self {
        Self {
            tolerance: Self::TOLERANCE,
            min_opaque_ratio: Self::MIN_OPAQUE_RATIO,
            margin_ratio: Self::MARGIN_RATIO,
        }
    }
}

/// Color removal followed by a neighbor vote on semi-transparent pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborVoteConfig {
    pub tolerance: u8,
    /// Gray levels removed in addition to the corner colors.
    pub gray_ladder: Vec<u8>,
    /// Pixels with alpha strictly between 0 and this are candidates for the vote.
    pub weak_alpha: u8,
    /// A neighbor counts as opaque above this alpha.
    pub opaque_neighbor_alpha: u8,
    pub min_opaque_neighbors: usize,
    pub contrast_gain: f32,
    pub contrast_offset: f32,
}

impl Default for NeighborVoteConfig {
    fn default() -> Self {
        Self {
            tolerance: 20,
            gray_ladder: vec![255, 250, 245, 240, 235, 230, 220, 210],
            weak_alpha: 128,
            opaque_neighbor_alpha: 200,
            min_opaque_neighbors: 3,
            contrast_gain: 1.1,
            contrast_offset: -5.0,
        }
    }
}

/// Plain white and exact light-gray removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhiteResidueConfig {
    pub white_min: u8,
    pub gray_min: u8,
}

impl Default for WhiteResidueConfig {
    fn default() -> Self {
        Self {
            white_min: 240,
            gray_min: 220,
        }
    }
}

/// Settings shared by the normalizer modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeConfig {
    pub target_size: u32,
    /// Content detection and the low end of alpha snapping.
    pub alpha_threshold: u8,
    pub padding: u32,
    /// Alpha in `alpha_threshold..solid_alpha` is forced to 255.
    pub solid_alpha: u8,
    pub sharpness: f32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            target_size: TARGET_SIZE,
            alpha_threshold: 50,
            padding: 2,
            solid_alpha: 200,
            sharpness: 1.2,
        }
    }
}

/// Where sprites live and how they are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    pub base_dir: PathBuf,
    pub skills_dir: PathBuf,
    pub character: String,
    pub max_frames: u32,
}

impl AssetLayout {
    pub fn new(base_dir: impl Into<PathBuf>, character: &str) -> Self {
        let base_dir = base_dir.into();
        Self {
            skills_dir: base_dir.join(DEFAULT_SKILLS_DIR),
            base_dir,
            character: character.to_string(),
            max_frames: MAX_FRAMES,
        }
    }

    /// `<character>_<animation><index>.png`
    pub fn frame_file_name(&self, animation: &str, index: u32) -> String {
        format!("{}_{}{}.png", self.character, animation, index)
    }

    /// Path of one frame; skill animations resolve under the skills directory.
    pub fn frame_path(&self, animation: &str, index: u32) -> PathBuf {
        let dir = if animation == SKILL_ANIMATION {
            &self.skills_dir
        } else {
            &self.base_dir
        };
        dir.join(self.frame_file_name(animation, index))
    }

    pub fn sprite_prefix(&self) -> String {
        format!("{}_", self.character)
    }

    pub fn output_dir(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DIR, DEFAULT_CHARACTER)
    }
}

/// Arguments shared by every job. All have defaults, so each job runs bare.
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Directory holding `<character>_<animation><n>.png` sprites
    #[arg(long, default_value = DEFAULT_BASE_DIR)]
    pub base_dir: PathBuf,

    /// Character name used as the file prefix
    #[arg(long, default_value = DEFAULT_CHARACTER)]
    pub character: String,
}

impl LayoutArgs {
    pub fn layout(&self) -> AssetLayout {
        AssetLayout::new(&self.base_dir, &self.character)
    }
}
