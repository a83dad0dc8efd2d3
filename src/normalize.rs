use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::config::NormalizeConfig;
use crate::errors::{Result, SpriteError};
use crate::imageops::{center_on_canvas, crop_to_content, fit_within, sharpen, snap_alpha};

/// How a sprite is brought onto the square target canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Keep exact-size sprites, scale squares directly, letterbox the rest.
    Fit,
    /// Crop to content, letterbox, force binary alpha and sharpen.
    Strict,
    /// Scale straight to the target, ignoring aspect ratio.
    Stretch,
}

/// What the normalizer did to a sprite, for progress lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resize {
    Unchanged,
    Scaled { from: (u32, u32), to: (u32, u32) },
}

impl std::fmt::Display for Resize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unchanged => write!(f, "already at target size"),
            Self::Scaled { from, to } => {
                write!(f, "{}x{} -> {}x{}", from.0, from.1, to.0, to.1)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    pub mode: NormalizeMode,
    pub config: NormalizeConfig,
}

impl Normalizer {
    pub fn new(mode: NormalizeMode) -> Self {
        Self {
            mode,
            config: NormalizeConfig::default(),
        }
    }

    pub const fn with_config(mode: NormalizeMode, config: NormalizeConfig) -> Self {
        Self { mode, config }
    }

    /// Produce a `target_size` square RGBA sprite.
    pub fn normalize(&self, image: &RgbaImage) -> Result<(RgbaImage, Resize)> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SpriteError::Validation {
                field: "image".to_string(),
                reason: "has no pixels".to_string(),
            });
        }

        match self.mode {
            NormalizeMode::Fit => self.fit(image),
            NormalizeMode::Strict => self.strict(image),
            NormalizeMode::Stretch => Ok(self.stretch(image)),
        }
    }

    fn fit(&self, image: &RgbaImage) -> Result<(RgbaImage, Resize)> {
        let target = self.config.target_size;
        let (width, height) = image.dimensions();

        if (width, height) == (target, target) {
            return Ok((image.clone(), Resize::Unchanged));
        }
        if width == height {
            return Ok(self.stretch(image));
        }
        self.letterbox(image)
    }

    fn strict(&self, image: &RgbaImage) -> Result<(RgbaImage, Resize)> {
        let cropped = crop_to_content(image, self.config.alpha_threshold, self.config.padding);
        let (mut canvas, letterboxed) = self.letterbox(&cropped)?;

        snap_alpha(
            &mut canvas,
            self.config.alpha_threshold,
            self.config.solid_alpha,
        );
        let canvas = sharpen(&canvas, self.config.sharpness);

        let to = match letterboxed {
            Resize::Scaled { to, .. } => to,
            Resize::Unchanged => cropped.dimensions(),
        };
        Ok((
            canvas,
            Resize::Scaled {
                from: image.dimensions(),
                to,
            },
        ))
    }

    fn stretch(&self, image: &RgbaImage) -> (RgbaImage, Resize) {
        let target = self.config.target_size;
        let resized = imageops::resize(image, target, target, FilterType::Lanczos3);
        (
            resized,
            Resize::Scaled {
                from: image.dimensions(),
                to: (target, target),
            },
        )
    }

    fn letterbox(&self, image: &RgbaImage) -> Result<(RgbaImage, Resize)> {
        let target = self.config.target_size;
        let (width, height) = image.dimensions();
        let (new_width, new_height) = fit_within(width, height, target);

        let resized = if (new_width, new_height) == (width, height) {
            image.clone()
        } else {
            imageops::resize(image, new_width, new_height, FilterType::Lanczos3)
        };

        let canvas = center_on_canvas(&resized, target).ok_or_else(|| SpriteError::Validation {
            field: "resized sprite".to_string(),
            reason: format!("{new_width}x{new_height} does not fit a {target}x{target} canvas"),
        })?;

        Ok((
            canvas,
            Resize::Scaled {
                from: (width, height),
                to: (new_width, new_height),
            },
        ))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizeMode::Fit)
    }
}
