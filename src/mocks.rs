use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use parking_lot::Mutex;

use crate::errors::{Result, SpriteError};
use crate::traits::{file_name, has_extension, SpriteRepository};

#[derive(Debug, Clone)]
enum StoredFile {
    Image(RgbaImage),
    Text(String),
}

impl StoredFile {
    fn len(&self) -> u64 {
        match self {
            Self::Image(image) => image.as_raw().len() as u64,
            Self::Text(text) => text.len() as u64,
        }
    }
}

/// In-memory repository for tests. Paths are compared verbatim.
#[derive(Debug, Default)]
pub struct InMemorySpriteRepository {
    files: Mutex<BTreeMap<PathBuf, StoredFile>>,
}

impl InMemorySpriteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(self, path: impl Into<PathBuf>, image: RgbaImage) -> Self {
        self.files.lock().insert(path.into(), StoredFile::Image(image));
        self
    }

    pub fn with_text(self, path: impl Into<PathBuf>, text: &str) -> Self {
        self.files
            .lock()
            .insert(path.into(), StoredFile::Text(text.to_string()));
        self
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().keys().cloned().collect()
    }

    fn get(&self, path: &Path, operation: &str) -> Result<StoredFile> {
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| SpriteError::not_found(path, operation))
    }

    fn not_an_image(path: &Path, operation: &str) -> SpriteError {
        SpriteError::ImageProcessing {
            path: path.display().to_string(),
            operation: operation.to_string(),
            source: "stored file is not an image".into(),
        }
    }
}

impl SpriteRepository for InMemorySpriteRepository {
    fn exists(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path)
    }

    fn list_pngs(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        Ok(self
            .files
            .lock()
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter(|path| has_extension(path, "png") && file_name(path).starts_with(prefix))
            .cloned()
            .collect())
    }

    fn load_rgba(&self, path: &Path) -> Result<RgbaImage> {
        match self.get(path, "load sprite")? {
            StoredFile::Image(image) => Ok(image),
            StoredFile::Text(_) => Err(Self::not_an_image(path, "load sprite")),
        }
    }

    fn save_png(&self, path: &Path, image: &RgbaImage) -> Result<()> {
        self.files
            .lock()
            .insert(path.to_path_buf(), StoredFile::Image(image.clone()));
        Ok(())
    }

    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        match self.get(path, "read dimensions")? {
            StoredFile::Image(image) => Ok(image.dimensions()),
            StoredFile::Text(_) => Err(Self::not_an_image(path, "read dimensions")),
        }
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        let stored = self.get(from, "copy sprite")?;
        self.files.lock().insert(to.to_path_buf(), stored);
        Ok(())
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        let mut files = self.files.lock();
        let stored = files
            .remove(from)
            .ok_or_else(|| SpriteError::not_found(from, "move sprite"))?;
        files.insert(to.to_path_buf(), stored);
        Ok(())
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        match self.get(path, "read text")? {
            StoredFile::Text(text) => Ok(text),
            StoredFile::Image(_) => Err(SpriteError::Validation {
                field: path.display().to_string(),
                reason: "is an image, not text".to_string(),
            }),
        }
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        self.files
            .lock()
            .insert(path.to_path_buf(), StoredFile::Text(content.to_string()));
        Ok(())
    }

    fn total_size(&self, root: &Path, extensions: &[&str]) -> Result<u64> {
        Ok(self
            .files
            .lock()
            .iter()
            .filter(|(path, _)| path.starts_with(root))
            .filter(|(path, _)| extensions.iter().any(|ext| has_extension(path, ext)))
            .map(|(_, stored)| stored.len())
            .sum())
    }
}
