use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for the sprite preparation jobs.
///
/// Each variant carries the path and the operation that failed so a batch job
/// can log a single line per skipped file without parsing error strings.
#[derive(Error, Debug)]
pub enum SpriteError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Filesystem error: {operation} failed for {path:?}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image processing error: {operation} failed (file: {path})")]
    ImageProcessing {
        path: String,
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {field} {reason}")]
    Validation { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, SpriteError>;

impl SpriteError {
    pub fn file_system(path: impl Into<PathBuf>, operation: &str, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            operation: operation.to_string(),
            source,
        }
    }

    pub fn image(path: impl Into<PathBuf>, operation: &str, source: image::ImageError) -> Self {
        Self::ImageProcessing {
            path: path.into().display().to_string(),
            operation: operation.to_string(),
            source: Box::new(source),
        }
    }

    pub fn not_found(path: impl Into<PathBuf>, operation: &str) -> Self {
        Self::file_system(
            path,
            operation,
            std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
        )
    }
}

/// Convert I/O errors to filesystem errors.
///
/// Code that knows the path should build `SpriteError::FileSystem` itself;
/// this conversion is the fallback for `?` on bare I/O calls.
impl From<std::io::Error> for SpriteError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("unknown"),
            operation: "unknown".to_string(),
            source: err,
        }
    }
}

/// Convert image crate errors to image processing errors.
impl From<image::ImageError> for SpriteError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageProcessing {
            path: "unknown".to_string(),
            operation: "image processing".to_string(),
            source: Box::new(err),
        }
    }
}

/// Walkdir failures are filesystem failures on the entry that broke the walk.
impl From<walkdir::Error> for SpriteError {
    fn from(err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("unknown"));
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk failed"));
        Self::FileSystem {
            path,
            operation: "directory walk".to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_operation_and_path() {
        let err = SpriteError::not_found("assets/ninja_idle1.png", "load sprite");
        let message = err.to_string();
        assert!(message.contains("load sprite"));
        assert!(message.contains("ninja_idle1.png"));
    }

    #[test]
    fn test_io_conversion_uses_unknown_context() {
        let err: SpriteError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        match err {
            SpriteError::FileSystem { path, operation, .. } => {
                assert_eq!(path, PathBuf::from("unknown"));
                assert_eq!(operation, "unknown");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
