//! Viewer behaviour through the public API, plus the optimizer/viewer
//! path contract.

use std::fs;

use image::{DynamicImage, ImageFormat, RgbImage};
use transit_map_gallery::catalog::{
    verify_catalog, Catalog, Category, Filter, ImagePaths, MapEntry, SiteRoots,
};
use transit_map_gallery::config::{AssetPaths, OptimizerConfig, ViewerConfig};
use transit_map_gallery::optimizer::Optimizer;
use transit_map_gallery::viewer::lazy::{intersection_ratio, IntersectionEntry, ObserverOptions, Rect};
use transit_map_gallery::viewer::lightbox::{ActionOutcome, FULL_RESOLUTION_ACTION};
use transit_map_gallery::viewer::render::{APP_ID, GALLERY_ID};
use transit_map_gallery::viewer::{
    JsonFileStore, ManifestHost, MemoryStore, Startup, StaticDocument, Theme, TransitMapViewer,
};

fn startup() -> Startup {
    Startup {
        prefers_dark: false,
        filter: Filter::All,
        year: 2026,
    }
}

fn national_and_city() -> Catalog {
    let assets = AssetPaths::default();
    Catalog::new(vec![
        MapEntry::new(
            "fta-national-am",
            "FTA National Route Map (Amharic)",
            "Federal Transport Authority National Intercity Bus Network",
            ImagePaths::for_stem("fta-national-route-map-am", &assets),
            Category::National,
            Some("FTA"),
        ),
        MapEntry::new(
            "sheger",
            "Sheger Route Network (Amharic)",
            "Sheger City Bus Service Routes",
            ImagePaths::for_stem("sheger-route-network-map-am", &assets),
            Category::City,
            Some("Sheger"),
        ),
    ])
}

#[test]
fn test_every_filter_matches_its_category() {
    let config = ViewerConfig::default();
    let catalog = Catalog::builtin(&config.assets);
    let mut viewer = TransitMapViewer::new(
        config,
        catalog.clone(),
        StaticDocument::with_mount(APP_ID),
        MemoryStore::new(),
        ManifestHost::new(),
        startup(),
    );

    for filter in Filter::TABS {
        viewer.apply_filter(filter);
        assert!(viewer.finish_filter());

        let shown: Vec<&str> = viewer.grid().cards().iter().map(|c| c.entry_id.as_str()).collect();
        let expected: Vec<&str> = catalog
            .entries()
            .iter()
            .filter(|e| filter.matches(e))
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(shown, expected, "filter {filter}");

        let gallery = viewer.document().inner_html(GALLERY_ID).unwrap();
        assert_eq!(gallery.matches(r#"class="map-card""#).count(), expected.len());
    }
}

#[test]
fn test_city_filter_example() {
    let mut viewer = TransitMapViewer::new(
        ViewerConfig::default(),
        national_and_city(),
        StaticDocument::with_mount(APP_ID),
        MemoryStore::new(),
        ManifestHost::new(),
        startup(),
    );

    viewer.apply_filter("city".parse().unwrap());
    viewer.finish_filter();

    assert_eq!(viewer.grid().len(), 1);
    let page = viewer.document().serialize(APP_ID).unwrap();
    assert_eq!(page.matches(r#"class="map-card""#).count(), 1);
    assert!(page.contains(r#"<div class="stat-value">1</div><div class="stat-label">National Maps</div>"#));
    assert!(page.contains(r#"<div class="stat-value">1</div><div class="stat-label">City Routes</div>"#));
    assert!(page.contains(r#"<div class="stat-value">2</div><div class="stat-label">Total Maps</div>"#));
}

#[test]
fn test_theme_persists_in_preference_file() {
    let tmp = tempfile::tempdir().unwrap();
    let prefs = tmp.path().join("preferences.json");

    let mut viewer = TransitMapViewer::new(
        ViewerConfig::default(),
        national_and_city(),
        StaticDocument::with_mount(APP_ID),
        JsonFileStore::open(&prefs).unwrap(),
        ManifestHost::new(),
        Startup {
            prefers_dark: true,
            ..startup()
        },
    );
    // No stored preference, so the system setting decides
    assert_eq!(viewer.state().theme, Theme::Dark);

    assert_eq!(viewer.toggle_theme().unwrap(), Theme::Light);

    // Reload with the system still preferring dark: the stored choice wins
    let reloaded = TransitMapViewer::new(
        ViewerConfig::default(),
        national_and_city(),
        StaticDocument::with_mount(APP_ID),
        JsonFileStore::open(&prefs).unwrap(),
        ManifestHost::new(),
        Startup {
            prefers_dark: true,
            ..startup()
        },
    );
    assert_eq!(reloaded.state().theme, Theme::Light);
}

#[test]
fn test_scrolling_reveals_cards_once() {
    let mut viewer = TransitMapViewer::new(
        ViewerConfig::default(),
        national_and_city(),
        StaticDocument::with_mount(APP_ID),
        MemoryStore::new(),
        ManifestHost::new(),
        startup(),
    );

    let viewport = Rect::new(0.0, 0.0, 1280.0, 720.0);
    let cards = [
        Rect::new(0.0, 400.0, 400.0, 300.0),
        Rect::new(0.0, 850.0, 400.0, 300.0),
    ];
    let entries = |options: ObserverOptions| -> Vec<IntersectionEntry> {
        cards
            .iter()
            .enumerate()
            .map(|(target, rect)| IntersectionEntry {
                target,
                ratio: intersection_ratio(*rect, viewport, options.root_margin),
            })
            .collect()
    };

    let card_entries = entries(viewer.config().card_observer);
    let image_entries = entries(viewer.config().image_observer);

    // Second card is below the fold but within the 200px image band
    assert_eq!(viewer.on_card_intersections(&card_entries), vec![0]);
    assert_eq!(viewer.on_image_intersections(&image_entries), vec![0, 1]);

    assert!(viewer.on_card_intersections(&card_entries).is_empty());
    assert!(viewer.on_image_intersections(&image_entries).is_empty());
}

#[test]
fn test_full_resolution_action_after_rebuild() {
    let mut viewer = TransitMapViewer::new(
        ViewerConfig::default(),
        national_and_city(),
        StaticDocument::with_mount(APP_ID),
        MemoryStore::new(),
        ManifestHost::new(),
        startup(),
    );
    viewer.apply_filter(Filter::Category(Category::City));
    viewer.finish_filter();

    let slide = viewer.slide_anchor(0).unwrap();
    assert_eq!(
        viewer.host().activate(FULL_RESOLUTION_ACTION, Some(&slide)),
        Some(ActionOutcome::OpenWindow {
            url: "./route-details/sheger-route-network-map-am.png".to_string()
        })
    );
}

#[test]
fn test_optimizer_output_satisfies_catalog_paths() {
    let tmp = tempfile::tempdir().unwrap();
    let input_dir = tmp.path().join("route-details");
    fs::create_dir_all(&input_dir).unwrap();

    let catalog = national_and_city();
    for stem in ["fta-national-route-map-am", "sheger-route-network-map-am"] {
        let img = RgbImage::from_fn(900, 600, |x, y| image::Rgb([x as u8, y as u8, 64]));
        DynamicImage::ImageRgb8(img)
            .save_with_format(input_dir.join(format!("{stem}.png")), ImageFormat::Png)
            .unwrap();
    }

    let roots = SiteRoots::from_project_root(tmp.path());
    assert!(!verify_catalog(&catalog, &roots).is_complete());

    Optimizer::new(OptimizerConfig {
        input_dir,
        output_dir: tmp.path().join("public").join("optimized"),
        ..OptimizerConfig::default()
    })
    .run()
    .unwrap();

    let report = verify_catalog(&catalog, &roots);
    assert_eq!(report.checked, 8);
    assert!(report.is_complete(), "missing: {:?}", report.missing);
}
