//! Shared data structures for the map catalog
//!
//! These structs describe the route maps the viewer renders. They are
//! configuration data: built once at startup and never mutated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::AssetPaths;
use crate::error::GalleryError;
use crate::optimizer::layout::{THUMBS_DIR, THUMBS_WEBP_DIR, WEBP_DIR};

/// Which tab a map belongs to
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    National,
    City,
    Details,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::National, Category::City, Category::Details];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::National => "national",
            Category::City => "city",
            Category::Details => "details",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "national" => Ok(Category::National),
            "city" => Ok(Category::City),
            "details" => Ok(Category::Details),
            other => Err(GalleryError::UnknownCategory(other.to_string())),
        }
    }
}

/// The four URLs of one map, all derived from the same filename stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePaths {
    /// Original full-resolution PNG
    pub image: String,
    /// PNG thumbnail for the grid
    pub thumbnail: String,
    pub thumbnail_webp: String,
    /// Full-size WebP for the lightbox
    pub image_webp: String,
}

impl ImagePaths {
    /// Paths for `stem`, matching what the optimizer writes
    pub fn for_stem(stem: &str, assets: &AssetPaths) -> Self {
        let originals = assets.originals.trim_end_matches('/');
        let optimized = assets.optimized.trim_end_matches('/');
        Self {
            image: format!("{originals}/{stem}.png"),
            thumbnail: format!("{optimized}/{THUMBS_DIR}/{stem}.png"),
            thumbnail_webp: format!("{optimized}/{THUMBS_WEBP_DIR}/{stem}.webp"),
            image_webp: format!("{optimized}/{WEBP_DIR}/{stem}.webp"),
        }
    }
}

/// Represents a single route map in the gallery
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MapEntry {
    /// Unique, stable identifier (e.g. "fta-national-en")
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub thumbnail: String,
    pub thumbnail_webp: String,
    pub image_webp: String,
    pub category: Category,
    /// Agency badge shown on the card, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

impl MapEntry {
    /// Build an entry whose paths come from `ImagePaths::for_stem`
    pub fn new(
        id: &str,
        title: &str,
        description: &str,
        paths: ImagePaths,
        category: Category,
        operator: Option<&str>,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            image: paths.image,
            thumbnail: paths.thumbnail,
            thumbnail_webp: paths.thumbnail_webp,
            image_webp: paths.image_webp,
            category,
            operator: operator.map(str::to_string),
        }
    }

    /// The four paths in the order image, thumbnail, thumbnail WebP, image WebP
    pub fn paths(&self) -> [&str; 4] {
        [
            &self.image,
            &self.thumbnail,
            &self.thumbnail_webp,
            &self.image_webp,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_for_stem() {
        let paths = ImagePaths::for_stem("taxi-route-network-map-am", &AssetPaths::default());
        assert_eq!(paths.image, "./route-details/taxi-route-network-map-am.png");
        assert_eq!(paths.thumbnail, "/optimized/thumbs/taxi-route-network-map-am.png");
        assert_eq!(
            paths.thumbnail_webp,
            "/optimized/thumbs-webp/taxi-route-network-map-am.webp"
        );
        assert_eq!(paths.image_webp, "/optimized/webp/taxi-route-network-map-am.webp");
    }

    #[test]
    fn test_category_parsing() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!(matches!(
            "bus".parse::<Category>(),
            Err(GalleryError::UnknownCategory(s)) if s == "bus"
        ));
    }

    #[test]
    fn test_entry_json_uses_camel_case() {
        let entry = MapEntry::new(
            "details-1",
            "Route Details - Page 1",
            "Detailed route information and schedules",
            ImagePaths::for_stem("route-details-page-1", &AssetPaths::default()),
            Category::Details,
            None,
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"thumbnailWebp\""));
        assert!(json.contains("\"category\":\"details\""));
        assert!(!json.contains("operator"));

        let restored: MapEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, entry);
    }
}
