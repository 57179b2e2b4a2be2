use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tracing::info;

use super::data::{Category, ImagePaths, MapEntry};
use crate::config::AssetPaths;
use crate::error::{GalleryError, Result};

/// Which entries the grid shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Category(Category),
}

impl Filter {
    /// Every filter tab, in display order
    pub const TABS: [Filter; 4] = [
        Filter::All,
        Filter::Category(Category::National),
        Filter::Category(Category::City),
        Filter::Category(Category::Details),
    ];

    pub fn matches(self, entry: &MapEntry) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(category) => entry.category == category,
        }
    }

    /// Value of the `data-filter` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Category(category) => category.as_str(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = GalleryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Filter::All);
        }
        s.parse().map(Filter::Category)
    }
}

/// Per-category counts shown in the stats block
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub national: usize,
    pub city: usize,
    pub details: usize,
    pub total: usize,
}

/// The immutable list of maps the viewer renders.
///
/// Constructed once (built-in list or a JSON file) and handed to the
/// viewer; there is no add/remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<MapEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<MapEntry>) -> Self {
        Self { entries }
    }

    /// The maps published on the site
    pub fn builtin(assets: &AssetPaths) -> Self {
        let p = |stem: &str| ImagePaths::for_stem(stem, assets);
        let fta = "Federal Transport Authority National Intercity Bus Network";

        Self::new(vec![
            MapEntry::new(
                "fta-national-am",
                "FTA National Route Map (Amharic)",
                fta,
                p("fta-national-route-map-am"),
                Category::National,
                Some("FTA"),
            ),
            MapEntry::new(
                "fta-national-en",
                "FTA National Route Map (English)",
                fta,
                p("fta-national-route-map-en"),
                Category::National,
                Some("FTA"),
            ),
            MapEntry::new(
                "fta-national-original",
                "FTA National Route Map",
                "Original Federal Transport Authority National Network Map",
                p("FTA-National-Route-Map"),
                Category::National,
                Some("FTA"),
            ),
            MapEntry::new(
                "anbessa",
                "Anbessa Route Network (Amharic)",
                "Anbessa City Bus Service Routes",
                p("anbessa-route-network-map-am"),
                Category::City,
                Some("Anbessa"),
            ),
            MapEntry::new(
                "sheger",
                "Sheger Route Network (Amharic)",
                "Sheger City Bus Service Routes",
                p("sheger-route-network-map-am"),
                Category::City,
                Some("Sheger"),
            ),
            MapEntry::new(
                "taxi",
                "Taxi Route Network (Amharic)",
                "Public Taxi Service Routes",
                p("taxi-route-network-map-am"),
                Category::City,
                Some("Taxi"),
            ),
            MapEntry::new(
                "details-1",
                "Route Details - Page 1",
                "Detailed route information and schedules",
                p("route-details-page-1"),
                Category::Details,
                None,
            ),
            MapEntry::new(
                "details-2",
                "Route Details - Page 2",
                "Additional route information and schedules",
                p("route-details-page-2"),
                Category::Details,
                None,
            ),
        ])
    }

    /// Parse a JSON array of entries
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| GalleryError::io(path, e))?;
        let catalog = Self::from_json(&json)?;
        info!(path = %path.display(), entries = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries matching `filter`, catalog order preserved
    pub fn filter(&self, filter: Filter) -> Vec<&MapEntry> {
        self.entries.iter().filter(|e| filter.matches(e)).collect()
    }

    pub fn count(&self, category: Category) -> usize {
        self.entries.iter().filter(|e| e.category == category).count()
    }

    /// Counts over the whole catalog, independent of the active filter
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            national: self.count(Category::National),
            city: self.count(Category::City),
            details: self.count(Category::Details),
            total: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(entries: &[&MapEntry]) -> Vec<String> {
        entries.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin(&AssetPaths::default());
        assert_eq!(
            catalog.stats(),
            CatalogStats {
                national: 3,
                city: 3,
                details: 2,
                total: 8
            }
        );
    }

    #[test]
    fn test_filter_all_preserves_order() {
        let catalog = Catalog::builtin(&AssetPaths::default());
        let all = catalog.filter(Filter::All);
        let expected: Vec<String> = catalog.entries().iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids(&all), expected);
    }

    #[test]
    fn test_filter_by_category_is_exact() {
        let catalog = Catalog::builtin(&AssetPaths::default());
        for category in Category::ALL {
            let filtered = catalog.filter(Filter::Category(category));
            assert_eq!(filtered.len(), catalog.count(category));
            assert!(filtered.iter().all(|e| e.category == category));
        }
        assert_eq!(
            ids(&catalog.filter(Filter::Category(Category::City))),
            vec!["anbessa", "sheger", "taxi"]
        );
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!(
            "details".parse::<Filter>().unwrap(),
            Filter::Category(Category::Details)
        );
        assert!("everything".parse::<Filter>().is_err());
        for tab in Filter::TABS {
            assert_eq!(tab.as_str().parse::<Filter>().unwrap(), tab);
        }
    }

    #[test]
    fn test_json_catalog_round_trip() {
        let catalog = Catalog::builtin(&AssetPaths::default());
        let restored = Catalog::from_json(&catalog.to_json().unwrap()).unwrap();
        assert_eq!(restored, catalog);
    }
}
