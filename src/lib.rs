pub mod analyze;
pub mod batch;
pub mod cli;
pub mod config;
pub mod errors;
pub mod frames;
pub mod imageops;
pub mod normalize;
pub mod organize;
pub mod patcher;
pub mod repository;
pub mod traits;
pub mod validator;

pub mod mocks;

pub use batch::{run_batch, BatchSummary, SpritePipeline};
pub use config::{AssetLayout, LayoutArgs};
pub use errors::{Result, SpriteError};
pub use frames::{detect_frames, FrameSet};
pub use imageops::BackgroundStrategy;
pub use normalize::{NormalizeMode, Normalizer};
pub use patcher::{ConfigPatcher, PatchOutcome};
pub use repository::FsSpriteRepository;
pub use traits::SpriteRepository;
pub use validator::{ValidationReport, Validator};

#[cfg(test)]
pub use mocks::*;
