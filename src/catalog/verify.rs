//! Check that every catalog path points at a file on disk
//!
//! The viewer never validates its entries; a typo only shows up as a
//! broken image. This pass resolves each URL against the site tree and
//! lists the ones with nothing behind them.

use std::path::PathBuf;

use tracing::{info, warn};

use super::library::Catalog;

/// Where URLs resolve to on disk
#[derive(Debug, Clone)]
pub struct SiteRoots {
    /// Served at `/` (holds `optimized/`)
    pub public_dir: PathBuf,
    /// Base for relative URLs such as `./route-details/x.png`
    pub project_dir: PathBuf,
}

impl SiteRoots {
    /// Conventional layout: `<root>/public` and `<root>`
    pub fn from_project_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            public_dir: root.join("public"),
            project_dir: root,
        }
    }

    /// Map a catalog URL to a file path. Remote URLs resolve to `None`.
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        if url.contains("://") || url.starts_with("data:") {
            return None;
        }
        if let Some(rest) = url.strip_prefix('/') {
            return Some(self.public_dir.join(rest));
        }
        let rest = url.strip_prefix("./").unwrap_or(url);
        Some(self.project_dir.join(rest))
    }
}

/// A catalog path with no file behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAsset {
    pub entry_id: String,
    pub url: String,
    pub resolved: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Number of local paths looked at
    pub checked: usize,
    pub missing: Vec<MissingAsset>,
}

impl VerifyReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Verify all four paths of every entry
pub fn verify_catalog(catalog: &Catalog, roots: &SiteRoots) -> VerifyReport {
    let mut report = VerifyReport::default();

    for entry in catalog.entries() {
        for url in entry.paths() {
            let Some(resolved) = roots.resolve(url) else {
                continue;
            };
            report.checked += 1;
            if !resolved.is_file() {
                warn!(entry = %entry.id, url, path = %resolved.display(), "Missing asset");
                report.missing.push(MissingAsset {
                    entry_id: entry.id.clone(),
                    url: url.to_string(),
                    resolved,
                });
            }
        }
    }

    info!(
        checked = report.checked,
        missing = report.missing.len(),
        "Catalog verification finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, ImagePaths, MapEntry};
    use crate::config::AssetPaths;
    use std::fs;

    #[test]
    fn test_resolve_urls() {
        let roots = SiteRoots::from_project_root("/site");
        assert_eq!(
            roots.resolve("/optimized/thumbs/a.png"),
            Some(PathBuf::from("/site/public/optimized/thumbs/a.png"))
        );
        assert_eq!(
            roots.resolve("./route-details/a.png"),
            Some(PathBuf::from("/site/route-details/a.png"))
        );
        assert_eq!(roots.resolve("https://cdn.example.com/a.png"), None);
    }

    #[test]
    fn test_reports_only_missing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let roots = SiteRoots::from_project_root(tmp.path());
        let entry = MapEntry::new(
            "taxi",
            "Taxi",
            "Taxi routes",
            ImagePaths::for_stem("taxi", &AssetPaths::default()),
            Category::City,
            Some("Taxi"),
        );

        for url in [&entry.image, &entry.thumbnail, &entry.thumbnail_webp] {
            let path = roots.resolve(url).unwrap();
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"x").unwrap();
        }

        let report = verify_catalog(&Catalog::new(vec![entry]), &roots);
        assert_eq!(report.checked, 4);
        assert!(!report.is_complete());
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].url, "/optimized/webp/taxi.webp");
    }
}
