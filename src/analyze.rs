use std::path::Path;

use image::{Rgba, RgbaImage};
use log::{debug, info, warn};

use crate::imageops::background::corner_pixels;
use crate::traits::{file_name, SpriteRepository};

const WHITE_LEVEL: u8 = 240;

/// Leftovers that show a sprite still needs cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteIssues {
    /// Visible pixels with every channel above 240.
    pub white_pixels: usize,
    /// Any visible pixel on the outermost row or column.
    pub border_content: bool,
}

impl SpriteIssues {
    pub fn inspect(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let white_pixels = image.pixels().filter(|p| is_visible_white(p)).count();
        let border_content = image.enumerate_pixels().any(|(x, y, p)| {
            p[3] > 0 && (x == 0 || y == 0 || x + 1 == width || y + 1 == height)
        });
        Self {
            white_pixels,
            border_content,
        }
    }

    pub const fn is_clean(&self) -> bool {
        self.white_pixels == 0 && !self.border_content
    }

    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.white_pixels > 0 {
            parts.push(format!("{} white pixels", self.white_pixels));
        }
        if self.border_content {
            parts.push("content on the border".to_string());
        }
        parts.join(", ")
    }
}

fn is_visible_white(pixel: &Rgba<u8>) -> bool {
    let [r, g, b, a] = pixel.0;
    r > WHITE_LEVEL && g > WHITE_LEVEL && b > WHITE_LEVEL && a > 0
}

/// Log corner colors and the white share of one sprite.
pub fn log_edges(name: &str, image: &RgbaImage) {
    let labels = ["top-left", "top-right", "bottom-left", "bottom-right"];
    debug!("{name}: {}x{}", image.width(), image.height());
    if image.width() == 0 || image.height() == 0 {
        return;
    }
    for (label, corner) in labels.iter().zip(corner_pixels(image)) {
        let [r, g, b, a] = corner.0;
        debug!("  {label}: RGBA({r}, {g}, {b}, {a})");
    }
    let total = image.width() as usize * image.height() as usize;
    let white = image.pixels().filter(|p| is_visible_white(p)).count();
    debug!(
        "  white pixels: {white}/{total} ({:.1}%)",
        white as f64 * 100.0 / total as f64
    );
}

/// Inspect every sprite; returns the lines describing sprites with issues.
pub fn find_sprite_issues<R: SpriteRepository + ?Sized>(
    repo: &R,
    dir: &Path,
    prefix: &str,
) -> crate::errors::Result<Vec<String>> {
    let mut issues = Vec::new();

    for path in repo.list_pngs(dir, prefix)? {
        let name = file_name(&path);
        match repo.load_rgba(&path) {
            Ok(image) => {
                log_edges(&name, &image);
                let found = SpriteIssues::inspect(&image);
                if found.is_clean() {
                    info!("[clean] {name}");
                } else {
                    issues.push(format!("{name}: {}", found.describe()));
                }
            }
            Err(e) => issues.push(format!("{name}: error - {e}")),
        }
    }

    for issue in &issues {
        warn!("{issue}");
    }
    Ok(issues)
}
