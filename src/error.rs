//! Error types for the gallery optimizer and viewer.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while optimizing images or rendering the gallery.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// The folder holding the source PNGs does not exist.
    #[error("source directory not found: {}", .0.display())]
    SourceDirMissing(PathBuf),

    /// Filesystem error with the path that caused it.
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to decode or encode a raster image.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The WebP encoder rejected the input.
    #[error("webp encode failed: {0}")]
    WebpEncode(String),

    /// Invalid JSON in a config, catalog or preference file.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A filter or category name that is not part of the catalog.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// The preference store could not be located or written.
    #[error("preference store error: {0}")]
    Preferences(String),
}

impl GalleryError {
    /// Wrap an IO error together with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type for gallery operations.
pub type Result<T> = std::result::Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = GalleryError::io(
            "public/optimized/thumbs",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("public/optimized/thumbs"));
        assert!(msg.contains("denied"));
    }
}
