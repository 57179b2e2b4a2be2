//! Discovery of the source PNG route maps

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::{GalleryError, Result};

/// List the PNG files directly inside `dir`.
///
/// Only regular files whose extension is `png` (any case) are returned.
/// Subdirectories are not searched. Entries come back in directory-listing
/// order, which is filesystem dependent.
pub fn list_png_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(GalleryError::SourceDirMissing(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if is_png(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}
