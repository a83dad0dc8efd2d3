use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::{AssetLayout, TARGET_SIZE};
use crate::frames::FrameSet;
use crate::traits::{file_name, SpriteRepository};

/// Extensions counted towards the project size.
pub const PROJECT_EXTENSIONS: [&str; 7] = ["html", "js", "css", "py", "png", "jpg", "md"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationCheck {
    pub animation: String,
    pub found: u32,
    pub expected: u32,
}

impl AnimationCheck {
    pub const fn complete(&self) -> bool {
        self.found == self.expected
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    pub path: PathBuf,
    pub required: bool,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterCheck {
    pub character: String,
    pub found: usize,
    pub expected: usize,
}

/// Presence of the building blocks a playable page needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupCheck {
    pub path: PathBuf,
    pub has_canvas: bool,
    pub has_script: bool,
    pub has_style: bool,
}

impl MarkupCheck {
    pub fn inspect(path: &Path, content: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            has_canvas: content.contains("<canvas"),
            has_script: content.contains("<script") || content.contains(".js"),
            has_style: content.contains("<style") || content.contains(".css"),
        }
    }

    pub const fn complete(&self) -> bool {
        self.has_canvas && self.has_script && self.has_style
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub animations: Vec<AnimationCheck>,
    pub missing_frames: Vec<PathBuf>,
    pub size_issues: Vec<String>,
    pub main_files: Vec<FileCheck>,
    pub other_characters: Vec<CharacterCheck>,
    pub markup: Vec<MarkupCheck>,
    pub project_size: Option<u64>,
}

impl ValidationReport {
    pub fn found_frames(&self) -> u32 {
        self.animations.iter().map(|a| a.found).sum()
    }

    pub fn expected_frames(&self) -> u32 {
        self.animations.iter().map(|a| a.expected).sum()
    }

    pub fn frames_complete(&self) -> bool {
        self.found_frames() == self.expected_frames()
    }

    pub fn required_files_present(&self) -> bool {
        self.main_files.iter().all(|f| f.present || !f.required)
    }

    /// Every expected frame and every required file exists.
    pub fn passed(&self) -> bool {
        self.frames_complete() && self.required_files_present()
    }

    pub fn completion_percent(&self) -> f64 {
        match self.expected_frames() {
            0 => 100.0,
            expected => f64::from(self.found_frames()) * 100.0 / f64::from(expected),
        }
    }

    pub fn log_summary(&self) {
        for file in &self.main_files {
            if file.present {
                info!("[ok] {}", file.path.display());
            } else if file.required {
                warn!("[missing] {}", file.path.display());
            } else {
                info!("[absent, optional] {}", file.path.display());
            }
        }

        for check in &self.animations {
            let mark = if check.complete() { "ok" } else { "incomplete" };
            info!(
                "{}: {}/{} frames [{mark}]",
                check.animation, check.found, check.expected
            );
        }

        for check in &self.other_characters {
            info!("{}: {}/{} files", check.character, check.found, check.expected);
        }

        for check in &self.markup {
            info!(
                "{} canvas:{} script:{} style:{}",
                check.path.display(),
                check.has_canvas,
                check.has_script,
                check.has_style
            );
        }

        info!(
            "frames found: {}/{} ({:.1}%)",
            self.found_frames(),
            self.expected_frames(),
            self.completion_percent()
        );
        if let Some(size) = self.project_size {
            info!("project size: {}", format_size(size));
        }

        if self.missing_frames.is_empty() {
            info!("all animations are present");
        } else {
            warn!("missing files ({}):", self.missing_frames.len());
            for path in &self.missing_frames {
                warn!("  - {}", path.display());
            }
        }

        if self.size_issues.is_empty() {
            info!("all sprites are {TARGET_SIZE}x{TARGET_SIZE}");
        } else {
            warn!("size problems:");
            for issue in &self.size_issues {
                warn!("  - {issue}");
            }
        }
    }
}

/// Read-only checks of the asset set before a play session.
#[derive(Debug, Clone)]
pub struct Validator {
    layout: AssetLayout,
    expected: FrameSet,
    project_root: PathBuf,
    main_files: Vec<(PathBuf, bool)>,
    other_characters: Vec<String>,
    other_animations: Vec<String>,
    markup_files: Vec<PathBuf>,
    measure_project: bool,
}

impl Validator {
    pub fn new(layout: AssetLayout, expected: FrameSet) -> Self {
        Self {
            layout,
            expected,
            project_root: PathBuf::from("."),
            main_files: Vec::new(),
            other_characters: Vec::new(),
            other_animations: Vec::new(),
            markup_files: Vec::new(),
            measure_project: false,
        }
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// A file relative to the project root. Optional files are reported only.
    pub fn with_main_file(mut self, path: impl Into<PathBuf>, required: bool) -> Self {
        self.main_files.push((path.into(), required));
        self
    }

    /// Single-frame `<character>_<animation>.png` sets for secondary characters.
    pub fn with_other_characters(mut self, characters: &[&str], animations: &[&str]) -> Self {
        self.other_characters = characters.iter().map(|c| c.to_string()).collect();
        self.other_animations = animations.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_markup_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.markup_files.push(path.into());
        self
    }

    pub const fn with_project_size(mut self) -> Self {
        self.measure_project = true;
        self
    }

    pub fn run<R: SpriteRepository + ?Sized>(&self, repo: &R) -> ValidationReport {
        let mut report = ValidationReport::default();

        for (path, required) in &self.main_files {
            let path = self.project_root.join(path);
            report.main_files.push(FileCheck {
                present: repo.exists(&path),
                path,
                required: *required,
            });
        }

        for (animation, expected) in self.expected.iter() {
            let mut found = 0;
            for index in 1..=expected {
                let path = self.layout.frame_path(animation, index);
                if repo.exists(&path) {
                    found += 1;
                } else {
                    report.missing_frames.push(path);
                }
            }
            report.animations.push(AnimationCheck {
                animation: animation.to_string(),
                found,
                expected,
            });
        }

        report.size_issues = self.size_issues(repo);

        for character in &self.other_characters {
            let found = self
                .other_animations
                .iter()
                .filter(|animation| {
                    let name = format!("{character}_{animation}.png");
                    repo.exists(&self.layout.base_dir.join(name))
                })
                .count();
            report.other_characters.push(CharacterCheck {
                character: character.clone(),
                found,
                expected: self.other_animations.len(),
            });
        }

        for path in &self.markup_files {
            let path = self.project_root.join(path);
            if !repo.exists(&path) {
                continue;
            }
            match repo.read_text(&path) {
                Ok(content) => report.markup.push(MarkupCheck::inspect(&path, &content)),
                Err(e) => warn!("could not read {}: {e}", path.display()),
            }
        }

        if self.measure_project {
            match repo.total_size(&self.project_root, &PROJECT_EXTENSIONS) {
                Ok(size) => report.project_size = Some(size),
                Err(e) => warn!("could not measure project size: {e}"),
            }
        }

        report
    }

    fn size_issues<R: SpriteRepository + ?Sized>(&self, repo: &R) -> Vec<String> {
        let sprites = match repo.list_pngs(&self.layout.base_dir, &self.layout.sprite_prefix()) {
            Ok(sprites) => sprites,
            Err(e) => return vec![format!("{}: {e}", self.layout.base_dir.display())],
        };

        sprites
            .iter()
            .filter_map(|path| match repo.dimensions(path) {
                Ok((TARGET_SIZE, TARGET_SIZE)) => None,
                Ok((width, height)) => Some(format!("{}: {width}x{height}", file_name(path))),
                Err(e) => Some(format!("{}: error - {e}", file_name(path))),
            })
            .collect()
    }
}

/// Human-readable byte count in B, KB or MB.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * KB;
    match bytes {
        b if b < KB => format!("{b} B"),
        b if b < MB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{:.1} MB", b as f64 / MB as f64),
    }
}
