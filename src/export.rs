//! Static export of the viewer: `index.html` plus `lightbox.json`

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::Catalog;
use crate::config::ViewerConfig;
use crate::error::{GalleryError, Result};
use crate::viewer::render::{render_document, APP_ID, LIGHTBOX_MANIFEST_FILE};
use crate::viewer::{ManifestHost, PreferenceStore, Startup, StaticDocument, TransitMapViewer};

/// Files written by [`export_site`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub index_html: PathBuf,
    pub lightbox_json: PathBuf,
    pub cards: usize,
}

/// Render the page as the viewer would show it on load and write it to
/// `out_dir`, together with the lightbox setup.
pub fn export_site<S: PreferenceStore>(
    out_dir: &Path,
    config: ViewerConfig,
    catalog: Catalog,
    store: S,
    startup: Startup,
) -> Result<ExportReport> {
    let viewer = TransitMapViewer::new(
        config.clone(),
        catalog,
        StaticDocument::with_mount(APP_ID),
        store,
        ManifestHost::new(),
        startup,
    );

    let theme = viewer.state().theme;
    let cards = viewer.grid().len();
    let (document, _, host) = viewer.into_parts();

    let app_html = document.serialize(APP_ID).unwrap_or_default();
    let html = render_document(&app_html, theme, &config);

    fs::create_dir_all(out_dir).map_err(|e| GalleryError::io(out_dir, e))?;

    let index_html = out_dir.join("index.html");
    fs::write(&index_html, html).map_err(|e| GalleryError::io(&index_html, e))?;

    let lightbox_json = out_dir.join(LIGHTBOX_MANIFEST_FILE);
    let manifest = serde_json::to_string_pretty(&host.manifest())?;
    fs::write(&lightbox_json, manifest).map_err(|e| GalleryError::io(&lightbox_json, e))?;

    info!(
        index = %index_html.display(),
        lightbox = %lightbox_json.display(),
        cards,
        %theme,
        "Exported static page"
    );

    Ok(ExportReport {
        index_html,
        lightbox_json,
        cards,
    })
}
