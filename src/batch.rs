use std::path::{Path, PathBuf};

use image::RgbaImage;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};

use crate::config::{NeighborVoteConfig, NormalizeConfig, WhiteResidueConfig};
use crate::errors::Result;
use crate::imageops::{count_opaque, snap_alpha, BackgroundStrategy};
use crate::normalize::{NormalizeMode, Normalizer, Resize};
use crate::traits::{file_name, SpriteRepository};

/// Background removal, then normalization, then an optional alpha snap.
#[derive(Debug, Clone, Default)]
pub struct SpritePipeline {
    pub background: Option<BackgroundStrategy>,
    pub normalizer: Option<Normalizer>,
    /// `(low, high)` bands for a final binary alpha pass.
    pub final_alpha: Option<(u8, u8)>,
}

impl SpritePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, strategy: BackgroundStrategy) -> Self {
        self.background = Some(strategy);
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn with_final_alpha(mut self, low: u8, high: u8) -> Self {
        self.final_alpha = Some((low, high));
        self
    }

    /// White and exact-gray removal, then the strict crop/letterbox/sharpen pass.
    pub fn white_residue() -> Self {
        Self::new()
            .with_background(BackgroundStrategy::WhiteResidue(
                WhiteResidueConfig::default(),
            ))
            .with_normalizer(Normalizer::new(NormalizeMode::Strict))
    }

    /// Corner-color removal with the neighbor vote, stretched to the target
    /// size and snapped to binary alpha.
    pub fn neighbor_vote() -> Self {
        let normalize = NormalizeConfig::default();
        Self::new()
            .with_background(BackgroundStrategy::NeighborVote(
                NeighborVoteConfig::default(),
            ))
            .with_normalizer(Normalizer::with_config(NormalizeMode::Stretch, normalize))
            .with_final_alpha(normalize.alpha_threshold, normalize.solid_alpha)
    }

    pub fn process(&self, image: &RgbaImage) -> Result<(RgbaImage, Option<Resize>)> {
        let mut current = match &self.background {
            Some(strategy) => strategy.apply(image),
            None => image.clone(),
        };

        let mut resize = None;
        if let Some(normalizer) = &self.normalizer {
            let (normalized, how) = normalizer.normalize(&current)?;
            current = normalized;
            resize = Some(how);
        }

        if let Some((low, high)) = self.final_alpha {
            snap_alpha(&mut current, low, high);
        }

        Ok((current, resize))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && self.succeeded.len() == self.total
    }

    pub fn any_succeeded(&self) -> bool {
        !self.succeeded.is_empty()
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let progress_bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
    ) {
        progress_bar.set_style(style.progress_chars("#>-"));
    }
    progress_bar
}

/// Run the pipeline over `files` one at a time. Results go to `output_dir`
/// under the same file name, or over the source when `output_dir` is `None`.
/// A failing file is logged and skipped; the rest of the batch still runs.
pub fn run_batch<R: SpriteRepository + ?Sized>(
    repo: &R,
    files: &[PathBuf],
    output_dir: Option<&Path>,
    pipeline: &SpritePipeline,
) -> BatchSummary {
    let mut summary = BatchSummary {
        total: files.len(),
        ..BatchSummary::default()
    };
    let progress_bar = progress_bar(files.len());

    for path in files {
        let name = file_name(path);
        let output = output_dir.map_or_else(|| path.clone(), |dir| dir.join(&name));

        match process_one(repo, path, &output, pipeline) {
            Ok(line) => {
                progress_bar.suspend(|| info!("{name}: {line}"));
                summary.succeeded.push(output);
            }
            Err(e) => {
                progress_bar.suspend(|| error!("{name}: {e}"));
                summary.failed.push((path.clone(), e.to_string()));
            }
        }
        progress_bar.inc(1);
    }

    progress_bar.finish_and_clear();
    info!(
        "{}/{} sprites processed",
        summary.succeeded.len(),
        summary.total
    );
    summary
}

fn process_one<R: SpriteRepository + ?Sized>(
    repo: &R,
    input: &Path,
    output: &Path,
    pipeline: &SpritePipeline,
) -> Result<String> {
    let source = repo.load_rgba(input)?;
    let before = count_opaque(&source);
    let (processed, resize) = pipeline.process(&source)?;
    repo.save_png(output, &processed)?;

    let after = count_opaque(&processed);
    Ok(match resize {
        Some(resize) => format!("{resize}, {before} -> {after} opaque pixels"),
        None => format!("{before} -> {after} opaque pixels"),
    })
}

/// Copy every matching sprite from `from_dir` into `to_dir`.
pub fn copy_sprites<R: SpriteRepository + ?Sized>(
    repo: &R,
    from_dir: &Path,
    to_dir: &Path,
    prefix: &str,
) -> Result<usize> {
    let sprites = repo.list_pngs(from_dir, prefix)?;
    for sprite in &sprites {
        let name = file_name(sprite);
        repo.copy_file(sprite, &to_dir.join(&name))?;
        info!("copied {name}");
    }
    Ok(sprites.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeuristicThresholds;
    use crate::mocks::InMemorySpriteRepository;
    use image::Rgba;

    fn blue_backdrop(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if x > width / 4 && x < width * 3 / 4 && y > height / 4 && y < height * 3 / 4 {
                Rgba([90, 30, 30, 255])
            } else {
                Rgba([20, 40, 230, 255])
            }
        })
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let repo = InMemorySpriteRepository::new()
            .with_image("skills/ninja_special1.png", blue_backdrop(40, 40))
            .with_text("skills/ninja_special2.png", "corrupt")
            .with_image("skills/ninja_special3.png", blue_backdrop(60, 30));
        let files = repo.list_pngs(Path::new("skills"), "").unwrap();

        let pipeline = SpritePipeline::new()
            .with_background(BackgroundStrategy::ColorHeuristic(
                HeuristicThresholds::default(),
            ))
            .with_normalizer(Normalizer::new(NormalizeMode::Fit));
        let summary = run_batch(&repo, &files, Some(Path::new("out")), &pipeline);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded.len(), 2);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, PathBuf::from("skills/ninja_special2.png"));
        assert!(!summary.all_succeeded());

        let out = repo.load_rgba(Path::new("out/ninja_special3.png")).unwrap();
        assert_eq!(out.dimensions(), (80, 80));
        assert_eq!(out.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_in_place_overwrites_source() {
        let repo = InMemorySpriteRepository::new()
            .with_image("skills/ninja_special1.png", blue_backdrop(80, 80));
        let files = vec![PathBuf::from("skills/ninja_special1.png")];
        let pipeline = SpritePipeline::new().with_background(BackgroundStrategy::ColorHeuristic(
            HeuristicThresholds::default(),
        ));

        let summary = run_batch(&repo, &files, None, &pipeline);
        assert!(summary.all_succeeded());
        let out = repo.load_rgba(&files[0]).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*out.get_pixel(40, 40), Rgba([90, 30, 30, 255]));
    }

    #[test]
    fn test_final_alpha_snap() -> Result<()> {
        let image = RgbaImage::from_pixel(80, 80, Rgba([5, 5, 5, 120]));
        let (out, resize) = SpritePipeline::new()
            .with_final_alpha(50, 200)
            .process(&image)?;
        assert!(resize.is_none());
        assert!(out.pixels().all(|p| p[3] == 255));
        Ok(())
    }

    #[test]
    fn test_neighbor_vote_pipeline_gives_binary_80px_sprite() -> Result<()> {
        // green backdrop, a gray sheet to drop, a red body with a soft rim
        let image = RgbaImage::from_fn(120, 90, |x, y| {
            let dx = x as i32 - 60;
            let dy = y as i32 - 45;
            match dx * dx + dy * dy {
                0..=400 => Rgba([150, 30, 30, 255]),
                401..=600 => Rgba([150, 30, 30, 90]),
                _ if y < 10 => Rgba([228, 228, 228, 255]),
                _ => Rgba([30, 200, 30, 255]),
            }
        });

        let pipeline = SpritePipeline::neighbor_vote();
        assert_eq!(pipeline.final_alpha, Some((50, 200)));
        let (out, resize) = pipeline.process(&image)?;

        assert_eq!(out.dimensions(), (80, 80));
        assert_eq!(
            resize,
            Some(Resize::Scaled {
                from: (120, 90),
                to: (80, 80)
            })
        );
        assert!(out.pixels().all(|p| p[3] == 0 || p[3] >= 200));
        assert_eq!(out.get_pixel(0, 79)[3], 0);
        assert_eq!(out.get_pixel(40, 40)[3], 255);
        Ok(())
    }

    #[test]
    fn test_white_residue_pipeline_uses_strict_mode() -> Result<()> {
        let pipeline = SpritePipeline::white_residue();
        assert!(pipeline.final_alpha.is_none());
        assert_eq!(
            pipeline.normalizer.as_ref().map(|n| n.mode),
            Some(NormalizeMode::Strict)
        );

        let image = RgbaImage::from_fn(50, 50, |x, y| {
            if (20..30).contains(&x) && (20..30).contains(&y) {
                Rgba([40, 40, 160, 255])
            } else {
                Rgba([250, 250, 250, 255])
            }
        });
        let (out, _) = pipeline.process(&image)?;
        assert_eq!(out.dimensions(), (80, 80));
        assert!(out.pixels().all(|p| p[3] == 0 || p[3] >= 200));
        Ok(())
    }

    #[test]
    fn test_copy_sprites() -> Result<()> {
        let repo = InMemorySpriteRepository::new()
            .with_image("chars/optimized/ninja_idle1.png", RgbaImage::new(80, 80))
            .with_image("chars/optimized/ninja_idle2.png", RgbaImage::new(80, 80));
        let copied = copy_sprites(
            &repo,
            Path::new("chars/optimized"),
            Path::new("chars"),
            "ninja_",
        )?;
        assert_eq!(copied, 2);
        assert!(repo.exists(Path::new("chars/ninja_idle2.png")));
        Ok(())
    }
}
