//! Output tree of the optimizer
//!
//! ```text
//! <root>/thumbs/<name>.png        resized PNG thumbnail
//! <root>/thumbs-webp/<stem>.webp  resized WebP thumbnail
//! <root>/webp/<stem>.webp         full-size WebP
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{GalleryError, Result};

/// Subdirectory for PNG thumbnails
pub const THUMBS_DIR: &str = "thumbs";
/// Subdirectory for full-size WebP copies
pub const WEBP_DIR: &str = "webp";
/// Subdirectory for WebP thumbnails
pub const THUMBS_WEBP_DIR: &str = "thumbs-webp";

/// The three derivative files produced for one source PNG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivativePaths {
    pub thumb_png: PathBuf,
    pub thumb_webp: PathBuf,
    pub full_webp: PathBuf,
}

/// Fixed directory layout rooted at the optimizer's output directory
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every directory the layout needs, root first
    pub fn directories(&self) -> [PathBuf; 4] {
        [
            self.root.clone(),
            self.root.join(THUMBS_DIR),
            self.root.join(WEBP_DIR),
            self.root.join(THUMBS_WEBP_DIR),
        ]
    }

    /// Create any missing directory of the layout.
    ///
    /// Returns the directories that had to be created. A failure here is
    /// fatal for the whole run.
    pub fn ensure(&self) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        for dir in self.directories() {
            if dir.is_dir() {
                continue;
            }
            fs::create_dir_all(&dir).map_err(|e| GalleryError::io(&dir, e))?;
            info!(dir = %dir.display(), "Created directory");
            created.push(dir);
        }
        Ok(created)
    }

    /// Derivative paths for a source file name such as `taxi-map.png`.
    ///
    /// The PNG thumbnail keeps the full file name; both WebP outputs use
    /// the stem so `<stem>.png` and `<stem>.webp` stay paired.
    pub fn derivatives(&self, file_name: &str) -> DerivativePaths {
        let stem = file_stem(file_name);
        DerivativePaths {
            thumb_png: self.root.join(THUMBS_DIR).join(file_name),
            thumb_webp: self.root.join(THUMBS_WEBP_DIR).join(format!("{stem}.webp")),
            full_webp: self.root.join(WEBP_DIR).join(format!("{stem}.webp")),
        }
    }
}

/// Strip a trailing `.png` extension, whatever its case
pub fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.eq_ignore_ascii_case("png") => stem,
        _ => file_name,
    }
}
