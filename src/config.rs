//! Configuration for the optimizer and the viewer.
//!
//! Both configs are plain serde structs with defaults matching the
//! published site. They are built once at startup (from defaults, an
//! optional JSON file and CLI overrides) and passed down explicitly.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{GalleryError, Result};
use crate::viewer::lazy::{ObserverOptions, ObserverOverrides};
use crate::viewer::lightbox::LightboxOptions;

/// Default folder holding the source route maps
pub const DEFAULT_INPUT_DIR: &str = "route-details";
/// Default root for the generated derivatives
pub const DEFAULT_OUTPUT_DIR: &str = "public/optimized";
/// Maximum thumbnail width in pixels
pub const THUMB_WIDTH: u32 = 600;
/// WebP quality for both thumbnail and full-size WebP
pub const WEBP_QUALITY: f32 = 85.0;
/// Delay between the fade-out of old cards and the grid rebuild
pub const FADE_DELAY_MS: u64 = 300;

/// PNG compression effort for thumbnails
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    Fast,
    Default,
    /// Equivalent of zlib level 9
    #[default]
    Best,
}

impl From<PngCompression> for image::codecs::png::CompressionType {
    fn from(value: PngCompression) -> Self {
        match value {
            PngCompression::Fast => Self::Fast,
            PngCompression::Default => Self::Default,
            PngCompression::Best => Self::Best,
        }
    }
}

/// Settings for one optimizer run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizerConfig {
    /// Folder with the source PNGs (not searched recursively)
    pub input_dir: PathBuf,
    /// Root of the derivative tree (`thumbs`, `webp`, `thumbs-webp`)
    pub output_dir: PathBuf,
    pub thumb_width: u32,
    /// 0.0 - 100.0
    pub webp_quality: f32,
    pub png_compression: PngCompression,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            thumb_width: THUMB_WIDTH,
            webp_quality: WEBP_QUALITY,
            png_compression: PngCompression::Best,
        }
    }
}

impl OptimizerConfig {
    /// Parse from a JSON string; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.webp_quality = config.webp_quality.clamp(0.0, 100.0);
        Ok(config)
    }

    /// Load from a JSON file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| GalleryError::io(path, e))?;
        Self::from_json(&json)
    }
}

/// URL prefixes shared by every catalog entry
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetPaths {
    /// Where the untouched PNGs are served from
    pub originals: String,
    /// Where the optimizer output is served from
    pub optimized: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            originals: "./route-details".to_string(),
            optimized: "/optimized".to_string(),
        }
    }
}

/// Links and credits in the page footer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterConfig {
    /// Source repository; a GitHub URL also gets a stars badge
    pub repository_url: Option<String>,
    pub author_name: String,
    pub author_url: Option<String>,
    pub dedication: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            repository_url: Some("https://github.com/rabira-hierpa/et-transit-map".to_string()),
            author_name: "Rabra Hierpa".to_string(),
            author_url: Some("https://rz-codes.com".to_string()),
            dedication: "ለኢትዪጲያ በፍቅር የተሰራ 🇪🇹".to_string(),
        }
    }
}

/// Settings for the page model and static export
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub site_title: String,
    pub subtitle: String,
    pub assets: AssetPaths,
    pub fade_delay_ms: u64,
    /// Stylesheets linked from the exported page, in order
    pub stylesheets: Vec<String>,
    /// Module scripts loaded by the exported page (the browser bundle)
    pub scripts: Vec<String>,
    pub footer: FooterConfig,
    pub lightbox: LightboxOptions,
    #[serde(deserialize_with = "card_observer")]
    pub card_observer: ObserverOptions,
    #[serde(deserialize_with = "image_observer")]
    pub image_observer: ObserverOptions,
}

// Missing observer fields fall back to that observer's defaults, not to
// the other observer's.
fn card_observer<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<ObserverOptions, D::Error> {
    let overrides = ObserverOverrides::deserialize(d)?;
    Ok(ObserverOptions::merge(ObserverOptions::cards(), overrides))
}

fn image_observer<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<ObserverOptions, D::Error> {
    let overrides = ObserverOverrides::deserialize(d)?;
    Ok(ObserverOptions::merge(ObserverOptions::images(), overrides))
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            site_title: "Ethiopian Public Transit Network".to_string(),
            subtitle: "Explore the National Intercity Public Bus Network and City Transit Routes"
                .to_string(),
            assets: AssetPaths::default(),
            fade_delay_ms: FADE_DELAY_MS,
            stylesheets: vec!["style.css".to_string()],
            scripts: vec!["main.js".to_string()],
            footer: FooterConfig::default(),
            lightbox: LightboxOptions::default(),
            card_observer: ObserverOptions::cards(),
            image_observer: ObserverOptions::images(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| GalleryError::io(path, e))?;
        Self::from_json(&json)
    }

    pub fn fade_delay(&self) -> Duration {
        Duration::from_millis(self.fade_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::lazy::RootMargin;

    #[test]
    fn test_optimizer_defaults() {
        let config = OptimizerConfig::default();
        assert_eq!(config.thumb_width, 600);
        assert_eq!(config.webp_quality, 85.0);
        assert_eq!(config.input_dir, PathBuf::from("route-details"));
        assert_eq!(config.output_dir, PathBuf::from("public/optimized"));
        assert_eq!(config.png_compression, PngCompression::Best);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = OptimizerConfig::from_json(r#"{"thumbWidth": 320, "webpQuality": 140}"#).unwrap();
        assert_eq!(config.thumb_width, 320);
        // Clamped to the encoder's range
        assert_eq!(config.webp_quality, 100.0);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_viewer_config_from_json() {
        let config = ViewerConfig::from_json(r#"{"fadeDelayMs": 0, "assets": {"optimized": "/cdn"}}"#)
            .unwrap();
        assert_eq!(config.fade_delay(), Duration::ZERO);
        assert_eq!(config.assets.optimized, "/cdn");
        assert_eq!(config.assets.originals, "./route-details");
    }

    #[test]
    fn test_footer_can_drop_repository_link() {
        let config = ViewerConfig::from_json(r#"{"footer": {"repositoryUrl": null}}"#).unwrap();
        assert_eq!(config.footer.repository_url, None);
        assert_eq!(config.footer.author_name, "Rabra Hierpa");
        assert_eq!(config.scripts, vec!["main.js".to_string()]);
    }

    #[test]
    fn test_partial_observer_keeps_its_own_defaults() {
        let config = ViewerConfig::from_json(r#"{"imageObserver": {"threshold": 0.05}}"#).unwrap();
        assert_eq!(config.image_observer.threshold, 0.05);
        assert_eq!(config.image_observer.root_margin, RootMargin::uniform(200.0));
        assert_eq!(config.card_observer, ObserverOptions::cards());

        let config =
            ViewerConfig::from_json(r#"{"cardObserver": {"rootMargin": {"bottom": -80}}}"#).unwrap();
        assert_eq!(config.card_observer.threshold, 0.1);
        assert_eq!(config.card_observer.root_margin.bottom, -80.0);
        assert_eq!(config.image_observer, ObserverOptions::images());
    }

    #[test]
    fn test_standalone_observer_options_need_both_fields() {
        assert!(serde_json::from_str::<ObserverOptions>(r#"{"threshold": 0.5}"#).is_err());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            OptimizerConfig::from_json("{not json"),
            Err(GalleryError::Json(_))
        ));
    }
}
