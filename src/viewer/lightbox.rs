//! Lightbox binding
//!
//! The full-screen viewer itself is a third-party widget. It is reached
//! through [`LightboxHost`]: initialize from a gallery selector, register
//! custom controls, destroy. Anchor bindings are taken when the host is
//! initialized, so the binding is torn down and rebuilt with the grid.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Control that opens the active slide's original in a new tab
pub const FULL_RESOLUTION_ACTION: &str = "full-resolution-button";
/// Control that downloads the active slide's original
pub const DOWNLOAD_ACTION: &str = "download-button";
/// File name used when the href has no usable last segment
pub const FALLBACK_DOWNLOAD_NAME: &str = "map.png";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 50,
            bottom: 50,
            left: 50,
            right: 50,
        }
    }
}

/// Construction options handed to the lightbox
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LightboxOptions {
    /// Root selector of the gallery
    pub gallery: String,
    /// Selector of the slide anchors inside the gallery
    pub children: String,
    pub padding: Padding,
    pub bg_opacity: f32,
    pub spacing: f32,
    pub allow_pan_to_next: bool,
    pub zoom: bool,
    pub pinch_to_close: bool,
    pub close_on_vertical_drag: bool,
    /// Slide size advertised on each anchor
    pub slide_width: u32,
    pub slide_height: u32,
}

impl Default for LightboxOptions {
    fn default() -> Self {
        Self {
            gallery: "#gallery".to_string(),
            children: "a".to_string(),
            padding: Padding::default(),
            bg_opacity: 0.95,
            spacing: 0.1,
            allow_pan_to_next: true,
            zoom: true,
            pinch_to_close: true,
            close_on_vertical_drag: true,
            slide_width: 2000,
            slide_height: 2000,
        }
    }
}

/// How a custom control is drawn in the lightbox toolbar
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ControlSpec {
    /// Position in the toolbar
    pub order: u32,
    pub is_button: bool,
    /// Inner SVG markup of the icon
    pub svg_inner: String,
    pub outline_id: String,
    pub title: String,
}

/// The anchor a slide was opened from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideAnchor {
    pub href: Option<String>,
}

impl SlideAnchor {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
        }
    }
}

/// What the page should do after a control is activated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Open `url` in a new browsing context
    OpenWindow { url: String },
    /// Trigger a download of `url` saved as `file_name`
    Download { url: String, file_name: String },
}

/// Activation callback; receives the active slide's anchor, if any
pub type ActionHandler = Box<dyn Fn(Option<&SlideAnchor>) -> Option<ActionOutcome>>;

/// Capability surface of the third-party lightbox
pub trait LightboxHost {
    fn init(&mut self, options: &LightboxOptions);
    fn register_action(&mut self, name: &str, spec: ControlSpec, on_activate: ActionHandler);
    fn destroy(&mut self);
}

fn active_href(slide: Option<&SlideAnchor>) -> Option<&str> {
    slide?.href.as_deref().filter(|href| !href.is_empty())
}

/// Open the active slide's original at full resolution
pub fn open_full_resolution(slide: Option<&SlideAnchor>) -> Option<ActionOutcome> {
    let url = active_href(slide)?;
    Some(ActionOutcome::OpenWindow {
        url: url.to_string(),
    })
}

/// Download the active slide's original, named after its last path segment
pub fn download_image(slide: Option<&SlideAnchor>) -> Option<ActionOutcome> {
    let url = active_href(slide)?;
    let file_name = url
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_DOWNLOAD_NAME);
    Some(ActionOutcome::Download {
        url: url.to_string(),
        file_name: file_name.to_string(),
    })
}

fn full_resolution_spec() -> ControlSpec {
    ControlSpec {
        order: 9,
        is_button: true,
        svg_inner: r#"<path d="M17 3H7c-1.1 0-2 .9-2 2v14c0 1.1.9 2 2 2h10c1.1 0 2-.9 2-2V5c0-1.1-.9-2-2-2zm0 16H7V5h10v14zm-1-9h-3V7h-2v3H8v2h3v3h2v-3h3z" fill="currentColor"/>"#.to_string(),
        outline_id: "pswp__icn-full-res".to_string(),
        title: "View Full Resolution".to_string(),
    }
}

fn download_spec() -> ControlSpec {
    ControlSpec {
        order: 8,
        is_button: true,
        svg_inner: r#"<path d="M19 9h-4V3H9v6H5l7 7 7-7zM5 18v2h14v-2H5z" fill="currentColor"/>"#
            .to_string(),
        outline_id: "pswp__icn-download".to_string(),
        title: "Download Image".to_string(),
    }
}

/// Binding between the card grid and a lightbox host
#[derive(Debug, Clone)]
pub struct Lightbox {
    options: LightboxOptions,
    bound: bool,
    generation: u32,
}

impl Lightbox {
    /// Register both custom controls and initialize the host
    pub fn bind<H: LightboxHost>(host: &mut H, options: LightboxOptions) -> Self {
        let mut lightbox = Self {
            options,
            bound: false,
            generation: 0,
        };
        lightbox.attach(host);
        lightbox
    }

    fn attach<H: LightboxHost>(&mut self, host: &mut H) {
        host.register_action(
            FULL_RESOLUTION_ACTION,
            full_resolution_spec(),
            Box::new(open_full_resolution),
        );
        host.register_action(DOWNLOAD_ACTION, download_spec(), Box::new(download_image));
        host.init(&self.options);
        self.bound = true;
        self.generation += 1;
        debug!(generation = self.generation, gallery = %self.options.gallery, "Lightbox bound");
    }

    /// Destroy and bind again, after the grid's anchors were replaced
    pub fn rebind<H: LightboxHost>(&mut self, host: &mut H) {
        if self.bound {
            host.destroy();
            self.bound = false;
        }
        self.attach(host);
    }

    pub fn options(&self) -> &LightboxOptions {
        &self.options
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// How many times the host has been initialized
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// A registered control as it appears in the manifest
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ControlEntry {
    pub name: String,
    #[serde(flatten)]
    pub spec: ControlSpec,
}

/// Serializable snapshot of a lightbox setup, for a front-end bootstrap
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LightboxManifest {
    pub options: LightboxOptions,
    pub controls: Vec<ControlEntry>,
}

/// Host that keeps what it is given instead of driving a widget.
///
/// Used by the static export to write `lightbox.json`, and able to
/// dispatch activations itself.
#[derive(Default)]
pub struct ManifestHost {
    options: Option<LightboxOptions>,
    controls: Vec<(ControlEntry, ActionHandler)>,
    init_count: u32,
    destroy_count: u32,
}

impl ManifestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.options.is_some()
    }

    pub fn init_count(&self) -> u32 {
        self.init_count
    }

    pub fn destroy_count(&self) -> u32 {
        self.destroy_count
    }

    pub fn control_names(&self) -> Vec<&str> {
        self.controls.iter().map(|(c, _)| c.name.as_str()).collect()
    }

    /// Run the handler of control `name` against `slide`
    pub fn activate(&self, name: &str, slide: Option<&SlideAnchor>) -> Option<ActionOutcome> {
        if !self.is_active() {
            return None;
        }
        let (_, handler) = self.controls.iter().find(|(c, _)| c.name == name)?;
        handler(slide)
    }

    /// Current setup, controls sorted by toolbar order
    pub fn manifest(&self) -> Option<LightboxManifest> {
        let options = self.options.clone()?;
        let mut controls: Vec<ControlEntry> = self.controls.iter().map(|(c, _)| c.clone()).collect();
        controls.sort_by_key(|c| c.spec.order);
        Some(LightboxManifest { options, controls })
    }
}

impl LightboxHost for ManifestHost {
    fn init(&mut self, options: &LightboxOptions) {
        self.options = Some(options.clone());
        self.init_count += 1;
    }

    fn register_action(&mut self, name: &str, spec: ControlSpec, on_activate: ActionHandler) {
        let entry = ControlEntry {
            name: name.to_string(),
            spec,
        };
        self.controls.push((entry, on_activate));
    }

    fn destroy(&mut self) {
        self.options = None;
        self.controls.clear();
        self.destroy_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_resolution_opens_href() {
        let slide = SlideAnchor::new("./route-details/taxi-route-network-map-am.png");
        assert_eq!(
            open_full_resolution(Some(&slide)),
            Some(ActionOutcome::OpenWindow {
                url: "./route-details/taxi-route-network-map-am.png".to_string()
            })
        );
    }

    #[test]
    fn test_download_uses_last_segment() {
        let slide = SlideAnchor::new("./route-details/route-details-page-2.png");
        assert_eq!(
            download_image(Some(&slide)),
            Some(ActionOutcome::Download {
                url: "./route-details/route-details-page-2.png".to_string(),
                file_name: "route-details-page-2.png".to_string(),
            })
        );

        let trailing = SlideAnchor::new("https://example.org/maps/");
        assert!(matches!(
            download_image(Some(&trailing)),
            Some(ActionOutcome::Download { file_name, .. }) if file_name == FALLBACK_DOWNLOAD_NAME
        ));
    }

    #[test]
    fn test_no_slide_no_outcome() {
        assert_eq!(open_full_resolution(None), None);
        assert_eq!(download_image(None), None);
        let empty = SlideAnchor { href: None };
        assert_eq!(download_image(Some(&empty)), None);
    }

    #[test]
    fn test_bind_registers_controls_and_inits() {
        let mut host = ManifestHost::new();
        let lightbox = Lightbox::bind(&mut host, LightboxOptions::default());

        assert!(lightbox.is_bound());
        assert!(host.is_active());
        assert_eq!(host.control_names(), vec![FULL_RESOLUTION_ACTION, DOWNLOAD_ACTION]);

        let manifest = host.manifest().unwrap();
        assert_eq!(manifest.options.gallery, "#gallery");
        assert_eq!(manifest.controls[0].name, DOWNLOAD_ACTION);
        assert_eq!(manifest.controls[1].spec.order, 9);
    }

    #[test]
    fn test_rebind_destroys_first() {
        let mut host = ManifestHost::new();
        let mut lightbox = Lightbox::bind(&mut host, LightboxOptions::default());
        lightbox.rebind(&mut host);

        assert_eq!(host.init_count(), 2);
        assert_eq!(host.destroy_count(), 1);
        assert_eq!(lightbox.generation(), 2);
        // No duplicate controls after the rebuild
        assert_eq!(host.control_names().len(), 2);
    }

    #[test]
    fn test_manifest_json_shape() {
        let mut host = ManifestHost::new();
        Lightbox::bind(&mut host, LightboxOptions::default());
        let json = serde_json::to_value(host.manifest().unwrap()).unwrap();
        assert_eq!(json["options"]["bgOpacity"], serde_json::json!(0.95f32));
        assert_eq!(json["options"]["pinchToClose"], serde_json::json!(true));
        assert_eq!(json["controls"][1]["outlineId"], "pswp__icn-full-res");
    }
}
