use crate::errors::Result;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Storage capability behind every job.
///
/// Pixel transforms never touch disk themselves; the jobs read and write
/// through this trait so the same code runs against the filesystem or an
/// in-memory store in tests.
pub trait SpriteRepository {
    fn exists(&self, path: &Path) -> bool;

    /// PNG files directly inside `dir` whose name starts with `prefix`, sorted by name.
    fn list_pngs(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>>;

    fn load_rgba(&self, path: &Path) -> Result<RgbaImage>;

    /// Always lossless PNG. Parent directories are created as needed.
    fn save_png(&self, path: &Path, image: &RgbaImage) -> Result<()>;

    /// Pixel dimensions without decoding the whole image where possible.
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)>;

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    fn move_file(&self, from: &Path, to: &Path) -> Result<()>;

    fn read_text(&self, path: &Path) -> Result<String>;

    fn write_text(&self, path: &Path, content: &str) -> Result<()>;

    /// Sum of file sizes below `root` for the given extensions (without dot).
    fn total_size(&self, root: &Path, extensions: &[&str]) -> Result<u64>;
}

/// True when the file name has the given extension, ignoring case.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
