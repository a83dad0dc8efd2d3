use image::{Rgb, Rgba, RgbaImage};
use log::debug;

use crate::config::{CornerKeyConfig, HeuristicThresholds, NeighborVoteConfig, WhiteResidueConfig};
use crate::imageops::alpha::count_opaque;

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// How background pixels are recognised. Exactly one strategy runs per job.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundStrategy {
    /// Blue/cyan, near-white and light-gray predicates.
    ColorHeuristic(HeuristicThresholds),
    /// Most frequent corner color, falling back to a center crop.
    CornerKey(CornerKeyConfig),
    /// Corner and gray-ladder removal, then a neighbor vote on soft edges.
    NeighborVote(NeighborVoteConfig),
    /// White and exact light-gray removal only.
    WhiteResidue(WhiteResidueConfig),
}

impl BackgroundStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ColorHeuristic(_) => "color-heuristic",
            Self::CornerKey(_) => "corner-key",
            Self::NeighborVote(_) => "neighbor-vote",
            Self::WhiteResidue(_) => "white-residue",
        }
    }

    pub fn apply(&self, image: &RgbaImage) -> RgbaImage {
        match self {
            Self::ColorHeuristic(thresholds) => remove_heuristic_background(image, thresholds),
            Self::CornerKey(config) => remove_corner_background(image, config).image,
            Self::NeighborVote(config) => remove_with_neighbor_vote(image, config),
            Self::WhiteResidue(config) => remove_white_residue(image, config),
        }
    }
}

/// The three predicates are evaluated in order; the first hit removes the pixel.
pub fn is_heuristic_background(pixel: &Rgba<u8>, thresholds: &HeuristicThresholds) -> bool {
    let [r, g, b, _] = pixel.0;
    let (r, g, b) = (i16::from(r), i16::from(g), i16::from(b));
    let dominance = i16::from(thresholds.blue_dominance);

    if b > i16::from(thresholds.blue_min) && b > r + dominance && b > g + dominance {
        return true;
    }

    let white = i16::from(thresholds.white_min);
    if r > white && g > white && b > white {
        return true;
    }

    let gray = i16::from(thresholds.gray_min);
    let spread = i16::from(thresholds.gray_spread);
    r > gray
        && g > gray
        && b > gray
        && (r - g).abs() < spread
        && (r - b).abs() < spread
        && (g - b).abs() < spread
}

/// Removed pixels become fully clear; everything else is copied untouched.
pub fn remove_heuristic_background(
    image: &RgbaImage,
    thresholds: &HeuristicThresholds,
) -> RgbaImage {
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        if is_heuristic_background(pixel, thresholds) {
            *pixel = CLEAR;
        }
    }
    output
}

/// Result of corner keying, with the color that was keyed out.
#[derive(Debug, Clone)]
pub struct CornerKeyOutcome {
    pub image: RgbaImage,
    pub background: Rgb<u8>,
    pub used_fallback: bool,
}

/// Corner colors in the order top-left, top-right, bottom-left, bottom-right.
pub fn corner_pixels(image: &RgbaImage) -> [Rgba<u8>; 4] {
    let right = image.width().saturating_sub(1);
    let bottom = image.height().saturating_sub(1);
    [
        *image.get_pixel(0, 0),
        *image.get_pixel(right, 0),
        *image.get_pixel(0, bottom),
        *image.get_pixel(right, bottom),
    ]
}

/// Most frequent RGB among the corners. Ties go to the earliest corner.
pub fn dominant_corner_color(image: &RgbaImage) -> Rgb<u8> {
    let corners = corner_pixels(image).map(|p| Rgb([p[0], p[1], p[2]]));
    let mut best = corners[0];
    let mut best_count = 0;
    for candidate in corners {
        let count = corners.iter().filter(|&&c| c == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

fn within_tolerance(pixel: &Rgba<u8>, color: [u8; 3], tolerance: u8) -> bool {
    pixel
        .0
        .iter()
        .zip(color)
        .all(|(&channel, target)| channel.abs_diff(target) <= tolerance)
}

pub fn remove_corner_background(image: &RgbaImage, config: &CornerKeyConfig) -> CornerKeyOutcome {
    if image.width() == 0 || image.height() == 0 {
        return CornerKeyOutcome {
            image: image.clone(),
            background: Rgb([0, 0, 0]),
            used_fallback: false,
        };
    }

    let background = dominant_corner_color(image);
    debug!("detected background color RGB{:?}", background.0);

    let mut keyed = image.clone();
    for pixel in keyed.pixels_mut() {
        if within_tolerance(pixel, background.0, config.tolerance) {
            pixel[3] = 0;
        }
    }

    let total = f64::from(image.width()) * f64::from(image.height());
    if (count_opaque(&keyed) as f64) < total * config.min_opaque_ratio {
        debug!("color keying left too few pixels, using center crop");
        return CornerKeyOutcome {
            image: center_crop(image, config.margin_ratio),
            background,
            used_fallback: true,
        };
    }

    CornerKeyOutcome {
        image: keyed,
        background,
        used_fallback: false,
    }
}

/// Clears a border of `floor(dim * margin_ratio)` pixels on each side.
pub fn center_crop(image: &RgbaImage, margin_ratio: f64) -> RgbaImage {
    let (width, height) = image.dimensions();
    let margin_x = (f64::from(width) * margin_ratio) as u32;
    let margin_y = (f64::from(height) * margin_ratio) as u32;

    RgbaImage::from_fn(width, height, |x, y| {
        let inside = x >= margin_x
            && x < width.saturating_sub(margin_x)
            && y >= margin_y
            && y < height.saturating_sub(margin_y);
        if inside {
            *image.get_pixel(x, y)
        } else {
            CLEAR
        }
    })
}

pub fn remove_with_neighbor_vote(image: &RgbaImage, config: &NeighborVoteConfig) -> RgbaImage {
    let mut output = image.clone();
    if output.width() == 0 || output.height() == 0 {
        return output;
    }

    let mut targets: Vec<[u8; 3]> = corner_pixels(image)
        .iter()
        .filter(|p| p[3] > 0)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    targets.extend(config.gray_ladder.iter().map(|&level| [level, level, level]));

    for pixel in output.pixels_mut() {
        if targets
            .iter()
            .any(|&target| within_tolerance(pixel, target, config.tolerance))
        {
            pixel[3] = 0;
        }
    }

    // candidates are fixed before voting; votes see alpha updated in scan order
    let (width, height) = output.dimensions();
    let candidates: Vec<(u32, u32)> = output
        .enumerate_pixels()
        .filter(|(_, _, p)| p[3] > 0 && p[3] < config.weak_alpha)
        .map(|(x, y, _)| (x, y))
        .collect();

    for (x, y) in candidates {
        let mut opaque_neighbors = 0;
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                if output.get_pixel(nx, ny)[3] > config.opaque_neighbor_alpha {
                    opaque_neighbors += 1;
                }
            }
        }
        if opaque_neighbors < config.min_opaque_neighbors {
            output.get_pixel_mut(x, y)[3] = 0;
        }
    }

    for pixel in output.pixels_mut() {
        if pixel[3] > config.weak_alpha {
            for channel in pixel.0.iter_mut().take(3) {
                let boosted = f32::from(*channel) * config.contrast_gain + config.contrast_offset;
                *channel = boosted.clamp(0.0, 255.0) as u8;
            }
        }
    }

    output
}

pub fn remove_white_residue(image: &RgbaImage, config: &WhiteResidueConfig) -> RgbaImage {
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let white = r >= config.white_min && g >= config.white_min && b >= config.white_min;
        let gray = r >= config.gray_min && r == g && g == b;
        if white || gray {
            *pixel = CLEAR;
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_sprite() -> RgbaImage {
        // 20x20 blue backdrop with a dark red 10x10 body in the middle
        RgbaImage::from_fn(20, 20, |x, y| {
            if (5..15).contains(&x) && (5..15).contains(&y) {
                Rgba([120, 20, 20, 255])
            } else {
                Rgba([30, 60, 220, 255])
            }
        })
    }

    #[test]
    fn test_heuristic_predicates() {
        let t = HeuristicThresholds::default();
        assert!(is_heuristic_background(&Rgba([30, 60, 220, 255]), &t));
        assert!(is_heuristic_background(&Rgba([245, 250, 241, 255]), &t));
        assert!(is_heuristic_background(&Rgba([210, 220, 205, 255]), &t));
        // blue but not dominant enough
        assert!(!is_heuristic_background(&Rgba([120, 120, 160, 255]), &t));
        // light but saturated
        assert!(!is_heuristic_background(&Rgba([250, 201, 201, 255]), &t));
        assert!(!is_heuristic_background(&Rgba([120, 20, 20, 255]), &t));

        // every comparison is strict
        assert!(!is_heuristic_background(&Rgba([100, 100, 150, 255]), &t));
        assert!(is_heuristic_background(&Rgba([100, 100, 151, 255]), &t));
        assert!(!is_heuristic_background(&Rgba([110, 100, 160, 255]), &t));
        assert!(is_heuristic_background(&Rgba([109, 100, 160, 255]), &t));
        assert!(!is_heuristic_background(&Rgba([200, 210, 210, 255]), &t));
        assert!(is_heuristic_background(&Rgba([201, 210, 210, 255]), &t));
        assert!(!is_heuristic_background(&Rgba([201, 231, 231, 255]), &t));
        assert!(is_heuristic_background(&Rgba([202, 231, 231, 255]), &t));

        // gray would swallow every near-white pixel, so switch it off
        let white_only = HeuristicThresholds {
            gray_min: u8::MAX,
            ..t
        };
        assert!(!is_heuristic_background(&Rgba([240, 240, 240, 255]), &white_only));
        assert!(!is_heuristic_background(&Rgba([241, 241, 240, 255]), &white_only));
        assert!(is_heuristic_background(&Rgba([241, 241, 241, 255]), &white_only));
    }

    #[test]
    fn test_heuristic_keeps_foreground_untouched() {
        let source = checker_sprite();
        let cleaned = remove_heuristic_background(&source, &HeuristicThresholds::default());
        assert_eq!(*cleaned.get_pixel(0, 0), CLEAR);
        assert_eq!(cleaned.get_pixel(7, 7), source.get_pixel(7, 7));
        assert_eq!(count_opaque(&cleaned), 100);
    }

    #[test]
    fn test_dominant_corner_prefers_majority() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([10, 10, 10, 255]));
        image.put_pixel(0, 0, Rgba([200, 0, 0, 255]));
        assert_eq!(dominant_corner_color(&image), Rgb([10, 10, 10]));
    }

    #[test]
    fn test_dominant_corner_tie_uses_first_corner() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([10, 10, 10, 255]));
        image.put_pixel(0, 0, Rgba([1, 2, 3, 255]));
        image.put_pixel(3, 0, Rgba([1, 2, 3, 255]));
        assert_eq!(dominant_corner_color(&image), Rgb([1, 2, 3]));
    }

    #[test]
    fn test_corner_key_removes_backdrop() {
        let outcome = remove_corner_background(&checker_sprite(), &CornerKeyConfig::default());
        assert!(!outcome.used_fallback);
        assert_eq!(outcome.background, Rgb([30, 60, 220]));
        assert_eq!(outcome.image.get_pixel(0, 0)[3], 0);
        assert_eq!(outcome.image.get_pixel(10, 10)[3], 255);
        assert_eq!(count_opaque(&outcome.image), 100);

        // tolerance is inclusive per channel
        let mut image = checker_sprite();
        image.put_pixel(5, 5, Rgba([60, 60, 220, 255]));
        image.put_pixel(6, 5, Rgba([31, 90, 190, 255]));
        image.put_pixel(7, 5, Rgba([61, 60, 220, 255]));
        image.put_pixel(8, 5, Rgba([30, 60, 251, 255]));
        let keyed = remove_corner_background(&image, &CornerKeyConfig::default()).image;
        assert_eq!(keyed.get_pixel(5, 5)[3], 0);
        assert_eq!(keyed.get_pixel(6, 5)[3], 0);
        assert_eq!(keyed.get_pixel(7, 5)[3], 255);
        assert_eq!(keyed.get_pixel(8, 5)[3], 255);
    }

    #[test]
    fn test_corner_key_falls_back_to_center_crop() {
        // body too close to the backdrop color, so keying removes everything
        let image = RgbaImage::from_fn(40, 20, |x, _| Rgba([100 + (x % 5) as u8, 100, 100, 255]));
        let outcome = remove_corner_background(&image, &CornerKeyConfig::default());
        assert!(outcome.used_fallback);

        // 15% of 40 is 6, 15% of 20 is 3
        for (x, y, pixel) in outcome.image.enumerate_pixels() {
            let inside = (6..34).contains(&x) && (3..17).contains(&y);
            if inside {
                assert_eq!(pixel, image.get_pixel(x, y));
            } else {
                assert_eq!(*pixel, CLEAR, "pixel ({x}, {y}) should be clear");
            }
        }
    }

    #[test]
    fn test_center_crop_margin_floors() {
        let image = RgbaImage::from_pixel(10, 10, Rgba([1, 1, 1, 255]));
        let cropped = center_crop(&image, 0.15);
        // floor(1.5) == 1
        assert_eq!(cropped.get_pixel(0, 5)[3], 0);
        assert_eq!(cropped.get_pixel(1, 5)[3], 255);
        assert_eq!(cropped.get_pixel(8, 5)[3], 255);
        assert_eq!(cropped.get_pixel(9, 5)[3], 0);
    }

    #[test]
    fn test_neighbor_vote_drops_isolated_soft_pixels() {
        let mut image = RgbaImage::from_pixel(9, 9, Rgba([0, 0, 0, 0]));
        // solid block in the top-left with a soft edge pixel beside it
        for y in 0..3 {
            for x in 0..3 {
                image.put_pixel(x, y, Rgba([100, 100, 100, 255]));
            }
        }
        image.put_pixel(3, 1, Rgba([100, 40, 40, 100]));
        // lonely soft pixel
        image.put_pixel(7, 7, Rgba([100, 40, 40, 100]));

        let config = NeighborVoteConfig {
            gray_ladder: Vec::new(),
            ..NeighborVoteConfig::default()
        };
        let cleaned = remove_with_neighbor_vote(&image, &config);

        assert_eq!(cleaned.get_pixel(3, 1)[3], 100);
        assert_eq!(cleaned.get_pixel(7, 7)[3], 0);
        // contrast boost on opaque pixels: 100 * 1.1 - 5 = 105
        assert_eq!(cleaned.get_pixel(1, 1).0, [105, 105, 105, 255]);
        // soft pixel keeps its colors
        assert_eq!(cleaned.get_pixel(3, 1).0, [100, 40, 40, 100]);
    }

    #[test]
    fn test_neighbor_vote_removes_corner_and_gray() {
        let mut image = RgbaImage::from_pixel(6, 6, Rgba([30, 200, 30, 255]));
        image.put_pixel(2, 2, Rgba([228, 228, 228, 255]));
        image.put_pixel(3, 3, Rgba([90, 10, 10, 255]));

        let cleaned = remove_with_neighbor_vote(&image, &NeighborVoteConfig::default());
        assert_eq!(cleaned.get_pixel(0, 0)[3], 0);
        assert_eq!(cleaned.get_pixel(2, 2)[3], 0);
        assert_eq!(cleaned.get_pixel(3, 3)[3], 255);
    }

    #[test]
    fn test_white_residue() {
        let mut image = RgbaImage::from_pixel(3, 1, Rgba([241, 250, 255, 255]));
        image.put_pixel(1, 0, Rgba([225, 225, 225, 255]));
        image.put_pixel(2, 0, Rgba([225, 226, 225, 255]));

        let cleaned = remove_white_residue(&image, &WhiteResidueConfig::default());
        assert_eq!(*cleaned.get_pixel(0, 0), CLEAR);
        assert_eq!(*cleaned.get_pixel(1, 0), CLEAR);
        assert_eq!(cleaned.get_pixel(2, 0).0, [225, 226, 225, 255]);
    }

    #[test]
    fn test_white_residue_limits_are_inclusive() {
        let config = WhiteResidueConfig::default();
        let cases = [
            ([240, 240, 240], true),
            ([240, 255, 241], true),
            ([239, 255, 255], false),
            ([220, 220, 220], true),
            ([219, 219, 219], false),
            ([230, 230, 231], false),
        ];
        for (rgb, removed) in cases {
            let image = RgbaImage::from_pixel(1, 1, Rgba([rgb[0], rgb[1], rgb[2], 255]));
            let cleaned = remove_white_residue(&image, &config);
            assert_eq!(cleaned.get_pixel(0, 0)[3] == 0, removed, "{rgb:?}");
        }
    }

    #[test]
    fn test_strategy_names_are_distinct() {
        let names = [
            BackgroundStrategy::ColorHeuristic(HeuristicThresholds::default()).name(),
            BackgroundStrategy::CornerKey(CornerKeyConfig::default()).name(),
            BackgroundStrategy::NeighborVote(NeighborVoteConfig::default()).name(),
            BackgroundStrategy::WhiteResidue(WhiteResidueConfig::default()).name(),
        ];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
