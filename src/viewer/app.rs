//! The viewer controller: state, rendering, observers and lightbox wiring

use std::time::Duration;

use tracing::{debug, info, warn};

use super::document::Document;
use super::lazy::{CardObserver, GridModel, ImageObserver, IntersectionEntry};
use super::lightbox::{Lightbox, LightboxHost, SlideAnchor};
use super::render::{render_gallery, render_shell, PageContext, APP_ID, GALLERY_ID};
use super::state::{Theme, ViewerState};
use super::theme::{load_theme, save_theme, PreferenceStore};
use crate::catalog::{Catalog, Filter};
use crate::config::ViewerConfig;
use crate::error::Result;

/// Class added to the root element in dark mode
pub const DARK_CLASS: &str = "dark";
/// Class marking cards that are about to be replaced
pub const FADE_OUT_CLASS: &str = "fade-out";

/// Facts about the environment at page load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Startup {
    /// System color-scheme preference
    pub prefers_dark: bool,
    pub filter: Filter,
    /// Current year for the footer
    pub year: i32,
}

impl Default for Startup {
    fn default() -> Self {
        use chrono::Datelike;
        Self {
            prefers_dark: false,
            filter: Filter::All,
            year: chrono::Local::now().year(),
        }
    }
}

/// Transit map viewer for one page view.
///
/// Owns the page state and drives the document, the preference store and
/// the lightbox host it was given. All methods run on the page's single
/// event loop.
pub struct TransitMapViewer<D, S, H> {
    config: ViewerConfig,
    catalog: Catalog,
    state: ViewerState,
    year: i32,
    document: D,
    store: S,
    host: H,
    lightbox: Option<Lightbox>,
    grid: GridModel,
    card_observer: CardObserver,
    image_observer: ImageObserver,
    rendered: bool,
    pending_filter: bool,
}

impl<D, S, H> TransitMapViewer<D, S, H>
where
    D: Document,
    S: PreferenceStore,
    H: LightboxHost,
{
    /// Resolve the theme, render the page, bind the lightbox and start
    /// observing. A document without the `app` mount renders nothing.
    pub fn new(
        config: ViewerConfig,
        catalog: Catalog,
        document: D,
        store: S,
        host: H,
        startup: Startup,
    ) -> Self {
        let theme = load_theme(&store, startup.prefers_dark);
        let state = ViewerState::new(startup.filter, theme);
        let grid = GridModel::default();

        let mut viewer = Self {
            card_observer: CardObserver::new(config.card_observer, &grid),
            image_observer: ImageObserver::new(config.image_observer, &grid),
            config,
            catalog,
            state,
            year: startup.year,
            document,
            store,
            host,
            lightbox: None,
            grid,
            rendered: false,
            pending_filter: false,
        };

        if viewer.state.is_dark_mode() {
            viewer.document.set_root_class(DARK_CLASS, true);
        }
        viewer.render();
        if viewer.rendered {
            viewer.lightbox = Some(Lightbox::bind(&mut viewer.host, viewer.config.lightbox.clone()));
        }

        info!(
            entries = viewer.catalog.len(),
            filter = %viewer.state.current_filter,
            theme = %viewer.state.theme,
            "Transit map viewer initialized"
        );
        viewer
    }

    fn context(&self) -> PageContext<'_> {
        PageContext {
            config: &self.config,
            catalog: &self.catalog,
            state: &self.state,
            year: self.year,
        }
    }

    fn render(&mut self) {
        let shell = render_shell(&self.context());
        if !self.document.set_inner_html(APP_ID, &shell) {
            debug!(mount = APP_ID, "Mount element missing, nothing rendered");
            return;
        }
        self.rendered = true;
        self.rebuild_grid();
    }

    /// Replace the gallery contents and recreate everything bound to them
    fn rebuild_grid(&mut self) -> bool {
        let cards = render_gallery(&self.context());
        if !self.document.set_inner_html(GALLERY_ID, &cards) {
            return false;
        }
        self.grid = GridModel::build(self.catalog.filter(self.state.current_filter));
        self.card_observer = CardObserver::new(self.config.card_observer, &self.grid);
        self.image_observer = ImageObserver::new(self.config.image_observer, &self.grid);
        true
    }

    /// Switch the filter and fade the current cards out.
    ///
    /// Returns how long the host should wait before calling
    /// [`finish_filter`](Self::finish_filter).
    pub fn apply_filter(&mut self, filter: Filter) -> Duration {
        self.state.current_filter = filter;
        self.document.set_active_filter(filter);
        self.document.add_card_class(FADE_OUT_CLASS);
        self.grid.mark_all_fading();
        self.pending_filter = true;
        debug!(%filter, "Filter applied, fading out cards");
        self.config.fade_delay()
    }

    /// Rebuild the grid for the current filter after the fade-out.
    ///
    /// Returns false when there was nothing to do or the gallery element
    /// is gone.
    pub fn finish_filter(&mut self) -> bool {
        if !self.pending_filter {
            return false;
        }
        self.pending_filter = false;

        if !self.rebuild_grid() {
            return false;
        }
        if let Some(lightbox) = self.lightbox.as_mut() {
            lightbox.rebind(&mut self.host);
        }
        info!(filter = %self.state.current_filter, cards = self.grid.len(), "Gallery rebuilt");
        true
    }

    /// Flip the theme, update the page and persist the choice
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.state.theme.toggled();
        self.state.theme = theme;
        self.document.set_root_class(DARK_CLASS, theme.is_dark());
        self.document.set_theme_icon(theme.icon());
        if let Err(e) = save_theme(&mut self.store, theme) {
            warn!(error = %e, "Failed to persist theme preference");
            return Err(e);
        }
        Ok(theme)
    }

    /// Deliver card observer entries; returns the cards revealed
    pub fn on_card_intersections(&mut self, entries: &[IntersectionEntry]) -> Vec<usize> {
        self.card_observer.handle(entries, &mut self.grid)
    }

    /// Deliver image observer entries; returns the images requested
    pub fn on_image_intersections(&mut self, entries: &[IntersectionEntry]) -> Vec<usize> {
        self.image_observer.handle(entries, &mut self.grid)
    }

    /// Load event of the thumbnail in card `index`
    pub fn on_image_load(&mut self, index: usize) -> bool {
        self.grid.image_loaded(index)
    }

    /// Anchor of the card at `index`, as the lightbox sees it
    pub fn slide_anchor(&self, index: usize) -> Option<SlideAnchor> {
        self.grid.card(index).map(|card| SlideAnchor::new(card.href.clone()))
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn lightbox(&self) -> Option<&Lightbox> {
        self.lightbox.as_ref()
    }

    pub fn card_observer(&self) -> &CardObserver {
        &self.card_observer
    }

    pub fn image_observer(&self) -> &ImageObserver {
        &self.image_observer
    }

    /// Give back the parts the viewer was built from
    pub fn into_parts(self) -> (D, S, H) {
        (self.document, self.store, self.host)
    }
}
