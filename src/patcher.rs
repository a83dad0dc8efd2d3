use std::path::Path;

use log::{info, warn};

use crate::errors::Result;
use crate::frames::FrameSet;
use crate::traits::SpriteRepository;

/// Outcome of a textual splice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    Patched(String),
    MarkerMissing,
    UnterminatedBlock,
}

/// Rewrites the frame-count block of a markup or script file.
#[derive(Debug, Clone)]
pub struct ConfigPatcher {
    pub marker: String,
    pub closing: String,
    pub indent: String,
}

impl ConfigPatcher {
    pub fn new(marker: &str, closing: &str) -> Self {
        Self {
            marker: marker.to_string(),
            closing: closing.to_string(),
            indent: "    ".to_string(),
        }
    }

    /// Marker line, one `name: count,` line per animation, then the closing token.
    pub fn render_block(&self, frames: &FrameSet) -> String {
        let mut block = self.marker.clone();
        block.push('\n');
        for (animation, count) in frames.iter() {
            block.push_str(&format!("{}{animation}: {count},\n", self.indent));
        }
        block.push_str(&self.closing);
        block
    }

    /// Replace marker through the first closing token after it. Only the first
    /// marker occurrence is touched.
    pub fn patch_text(&self, content: &str, frames: &FrameSet) -> PatchOutcome {
        let Some(start) = content.find(&self.marker) else {
            return PatchOutcome::MarkerMissing;
        };
        let search_from = start + self.marker.len();
        let Some(relative_end) = content[search_from..].find(&self.closing) else {
            return PatchOutcome::UnterminatedBlock;
        };
        let end = search_from + relative_end + self.closing.len();

        let mut patched = String::with_capacity(content.len());
        patched.push_str(&content[..start]);
        patched.push_str(&self.render_block(frames));
        patched.push_str(&content[end..]);
        PatchOutcome::Patched(patched)
    }

    /// Patch a file in place. Returns whether the file was rewritten; a missing
    /// file, marker or closing token is a warning, not an error.
    pub fn patch_file<R: SpriteRepository + ?Sized>(
        &self,
        repo: &R,
        path: &Path,
        frames: &FrameSet,
    ) -> Result<bool> {
        if !repo.exists(path) {
            warn!("{} not found, configuration left unchanged", path.display());
            return Ok(false);
        }

        let content = repo.read_text(path)?;
        match self.patch_text(&content, frames) {
            PatchOutcome::Patched(patched) => {
                repo.write_text(path, &patched)?;
                for (animation, count) in frames.iter() {
                    info!("{animation}: {count} frames");
                }
                info!("updated frame configuration in {}", path.display());
                Ok(true)
            }
            PatchOutcome::MarkerMissing => {
                warn!("marker `{}` not found in {}", self.marker, path.display());
                Ok(false)
            }
            PatchOutcome::UnterminatedBlock => {
                warn!(
                    "no `{}` after marker `{}` in {}",
                    self.closing,
                    self.marker,
                    path.display()
                );
                Ok(false)
            }
        }
    }
}

impl Default for ConfigPatcher {
    fn default() -> Self {
        Self::new(crate::config::CONFIG_MARKER, crate::config::CONFIG_CLOSING)
    }
}
