use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use walkdir::WalkDir;

use crate::errors::{Result, SpriteError};
use crate::traits::{file_name, has_extension, SpriteRepository};

/// Repository backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSpriteRepository;

impl FsSpriteRepository {
    pub const fn new() -> Self {
        Self
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| SpriteError::file_system(parent, "create output directory", e))?;
        }
        Ok(())
    }
}

impl SpriteRepository for FsSpriteRepository {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_pngs(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(SpriteError::not_found(dir, "list sprites"));
        }

        let mut sprites = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file()
                && has_extension(path, "png")
                && file_name(path).starts_with(prefix)
            {
                sprites.push(path.to_path_buf());
            }
        }
        sprites.sort();
        Ok(sprites)
    }

    fn load_rgba(&self, path: &Path) -> Result<RgbaImage> {
        let image = image::open(path).map_err(|e| SpriteError::image(path, "load sprite", e))?;
        Ok(image.into_rgba8())
    }

    fn save_png(&self, path: &Path, image: &RgbaImage) -> Result<()> {
        Self::ensure_parent(path)?;

        let file =
            File::create(path).map_err(|e| SpriteError::file_system(path, "create sprite", e))?;
        let encoder = PngEncoder::new_with_quality(
            BufWriter::new(file),
            CompressionType::Best,
            FilterType::Adaptive,
        );
        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| SpriteError::image(path, "encode png", e))
    }

    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        image::image_dimensions(path).map_err(|e| SpriteError::image(path, "read dimensions", e))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        Self::ensure_parent(to)?;
        fs::copy(from, to).map_err(|e| SpriteError::file_system(from, "copy sprite", e))?;
        Ok(())
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        Self::ensure_parent(to)?;
        if fs::rename(from, to).is_err() {
            // rename fails across devices; fall back to copy + delete
            fs::copy(from, to).map_err(|e| SpriteError::file_system(from, "move sprite", e))?;
            fs::remove_file(from)
                .map_err(|e| SpriteError::file_system(from, "remove moved sprite", e))?;
        }
        Ok(())
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| SpriteError::file_system(path, "read text", e))
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        Self::ensure_parent(path)?;
        fs::write(path, content).map_err(|e| SpriteError::file_system(path, "write text", e))
    }

    fn total_size(&self, root: &Path, extensions: &[&str]) -> Result<u64> {
        let mut total = 0;
        for entry in WalkDir::new(root) {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file()
                && extensions.iter().any(|ext| has_extension(path, ext))
            {
                total += entry.metadata()?.len();
            }
        }
        Ok(total)
    }
}
