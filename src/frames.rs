use log::info;

use crate::config::{AssetLayout, SKILL_ANIMATION};
use crate::traits::SpriteRepository;

/// Animation name to frame count, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameSet {
    entries: Vec<(String, u32)>,
}

impl FrameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite, keeping the original position on overwrite.
    pub fn insert(&mut self, animation: impl Into<String>, count: u32) {
        let animation = animation.into();
        match self.entries.iter_mut().find(|(name, _)| *name == animation) {
            Some(entry) => entry.1 = count,
            None => self.entries.push((animation, count)),
        }
    }

    pub fn get(&self, animation: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(name, _)| name == animation)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_frames(&self) -> u32 {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for FrameSet {
    fn from_iter<T: IntoIterator<Item = (S, u32)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (animation, count) in iter {
            set.insert(animation, count);
        }
        set
    }
}

/// Count contiguous frames starting at index 1, stopping at the first gap.
pub fn count_frames<R: SpriteRepository + ?Sized>(
    repo: &R,
    layout: &AssetLayout,
    animation: &str,
) -> u32 {
    (1..=layout.max_frames)
        .take_while(|&index| repo.exists(&layout.frame_path(animation, index)))
        .last()
        .unwrap_or(0)
}

/// Probe every candidate animation; animations without a first frame are left out.
pub fn detect_frames<R: SpriteRepository + ?Sized>(
    repo: &R,
    layout: &AssetLayout,
    animations: &[&str],
) -> FrameSet {
    let mut detected = FrameSet::new();

    for &animation in animations {
        let count = count_frames(repo, layout, animation);
        let location = if animation == SKILL_ANIMATION {
            "skills/"
        } else {
            "base"
        };

        if count > 0 {
            info!("{animation}: {count} frames ({location})");
            detected.insert(animation, count);
        } else {
            info!("{animation}: no frames found");
        }
    }

    detected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CANDIDATE_ANIMATIONS;
    use crate::mocks::InMemorySpriteRepository;
    use image::RgbaImage;

    fn repo_with(files: &[&str]) -> InMemorySpriteRepository {
        files.iter().fold(InMemorySpriteRepository::new(), |repo, file| {
            repo.with_image(format!("chars/{file}"), RgbaImage::new(1, 1))
        })
    }

    #[test]
    fn test_detection_stops_at_first_gap() {
        let repo = repo_with(&["ninja_idle1.png", "ninja_idle2.png", "ninja_idle4.png"]);
        let layout = AssetLayout::new("chars", "ninja");
        assert_eq!(count_frames(&repo, &layout, "idle"), 2);
    }

    #[test]
    fn test_missing_animations_are_omitted() {
        let repo = repo_with(&[
            "ninja_walk1.png",
            "ninja_walk2.png",
            "ninja_idle1.png",
            "skills/ninja_special1.png",
            "skills/ninja_special2.png",
            "skills/ninja_special3.png",
        ]);
        let layout = AssetLayout::new("chars", "ninja");

        let detected = detect_frames(&repo, &layout, &CANDIDATE_ANIMATIONS);
        let entries: Vec<_> = detected.iter().collect();
        assert_eq!(entries, vec![("idle", 1), ("walk", 2), ("special", 3)]);
        assert_eq!(detected.get("jump"), None);
    }

    #[test]
    fn test_special_frames_only_count_in_skills_dir() {
        let repo = repo_with(&["ninja_special1.png"]);
        let layout = AssetLayout::new("chars", "ninja");
        assert_eq!(count_frames(&repo, &layout, "special"), 0);
    }

    #[test]
    fn test_frame_cap() {
        let names: Vec<String> = (1..=12).map(|i| format!("ninja_walk{i}.png")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let repo = repo_with(&refs);
        let layout = AssetLayout::new("chars", "ninja");
        assert_eq!(count_frames(&repo, &layout, "walk"), 9);
    }

    #[test]
    fn test_frame_set_keeps_insertion_order() {
        let mut set: FrameSet = [("walk", 6), ("idle", 4)].into_iter().collect();
        set.insert("walk", 5);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![("walk", 5), ("idle", 4)]);
        assert_eq!(set.total_frames(), 9);
    }
}
