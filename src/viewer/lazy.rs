//! Viewport-driven lazy loading
//!
//! Two observers run over the card grid. The card observer reveals a card
//! (CSS transition) once it is 10% on screen; the image observer swaps the
//! real thumbnail in once the placeholder gets within 200px of the
//! viewport. Both stop watching an element after it triggers, and both are
//! rebuilt whenever the grid is.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::MapEntry;

/// Inline SVG shown until the real thumbnail is requested
pub const PLACEHOLDER_SRC: &str =
    "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 600 400'%3E%3C/svg%3E";

/// CSS-style margin around the viewport, in pixels. Negative values shrink it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    pub fn uniform(px: f64) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }
}

/// Trigger settings of one observer.
///
/// Both fields are required when deserialized on their own; configs that
/// leave fields out go through [`ObserverOptions::merge`] with the
/// observer's own defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObserverOptions {
    /// Visible fraction of the target needed to trigger
    pub threshold: f64,
    pub root_margin: RootMargin,
}

/// Observer settings as written in a config file, any field may be absent
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObserverOverrides {
    pub threshold: Option<f64>,
    pub root_margin: Option<RootMargin>,
}

impl ObserverOptions {
    /// 10% visible, 50px before the bottom edge
    pub fn cards() -> Self {
        Self {
            threshold: 0.1,
            root_margin: RootMargin {
                bottom: -50.0,
                ..Default::default()
            },
        }
    }

    /// Barely visible, inside a 200px band around the viewport
    pub fn images() -> Self {
        Self {
            threshold: 0.01,
            root_margin: RootMargin::uniform(200.0),
        }
    }

    /// `base` with the fields present in `overrides` replaced
    pub fn merge(base: Self, overrides: ObserverOverrides) -> Self {
        Self {
            threshold: overrides.threshold.unwrap_or(base.threshold),
            root_margin: overrides.root_margin.unwrap_or(base.root_margin),
        }
    }

    pub fn is_intersecting(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }
}

/// Axis-aligned box in page coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn expand(self, m: RootMargin) -> Self {
        Self {
            x: self.x - m.left,
            y: self.y - m.top,
            width: (self.width + m.left + m.right).max(0.0),
            height: (self.height + m.top + m.bottom).max(0.0),
        }
    }
}

/// Fraction of `target` inside the viewport grown (or shrunk) by `margin`
pub fn intersection_ratio(target: Rect, viewport: Rect, margin: RootMargin) -> f64 {
    let root = viewport.expand(margin);
    let w = (target.x + target.width).min(root.x + root.width) - target.x.max(root.x);
    let h = (target.y + target.height).min(root.y + root.height) - target.y.max(root.y);
    if w < 0.0 || h < 0.0 {
        return 0.0;
    }

    let area = target.width * target.height;
    if area <= 0.0 {
        // Zero-size targets count as fully visible once they touch the root
        return 1.0;
    }
    (w * h) / area
}

/// One observation delivered by the host for the element at `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: usize,
    pub ratio: f64,
}

/// Where a lazy thumbnail is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    /// Showing the placeholder, real path parked in `data-src`
    Deferred,
    /// Real sources swapped in, waiting for the load event
    Requested,
    Loaded,
}

/// The `<picture>` of one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyImage {
    pub state: ImageState,
    pub src: String,
    pub srcset: Option<String>,
    pub data_src: String,
    pub data_srcset: String,
    pub placeholder_hidden: bool,
}

impl LazyImage {
    pub fn new(thumbnail: &str, thumbnail_webp: &str) -> Self {
        Self {
            state: ImageState::Deferred,
            src: PLACEHOLDER_SRC.to_string(),
            srcset: None,
            data_src: thumbnail.to_string(),
            data_srcset: thumbnail_webp.to_string(),
            placeholder_hidden: false,
        }
    }

    /// Swap the deferred sources in. Returns false if already done.
    fn request(&mut self) -> bool {
        if self.state != ImageState::Deferred {
            return false;
        }
        self.srcset = Some(self.data_srcset.clone());
        self.src = self.data_src.clone();
        self.state = ImageState::Requested;
        true
    }

    /// Load event. Only images that were requested react to it.
    fn loaded(&mut self) -> bool {
        if self.state != ImageState::Requested {
            return false;
        }
        self.state = ImageState::Loaded;
        self.placeholder_hidden = true;
        true
    }
}

/// Live state of one rendered card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardNode {
    pub entry_id: String,
    /// Anchor href, the full-resolution PNG
    pub href: String,
    pub visible: bool,
    pub fading: bool,
    pub image: LazyImage,
}

/// The rendered grid, rebuilt wholesale on every filter change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridModel {
    cards: Vec<CardNode>,
}

impl GridModel {
    pub fn build<'a>(entries: impl IntoIterator<Item = &'a MapEntry>) -> Self {
        let cards = entries
            .into_iter()
            .map(|entry| CardNode {
                entry_id: entry.id.clone(),
                href: entry.image.clone(),
                visible: false,
                fading: false,
                image: LazyImage::new(&entry.thumbnail, &entry.thumbnail_webp),
            })
            .collect();
        Self { cards }
    }

    pub fn cards(&self) -> &[CardNode] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&CardNode> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn mark_all_fading(&mut self) {
        for card in &mut self.cards {
            card.fading = true;
        }
    }

    /// Load event for the thumbnail of card `index`
    pub fn image_loaded(&mut self, index: usize) -> bool {
        self.cards
            .get_mut(index)
            .map(|card| card.image.loaded())
            .unwrap_or(false)
    }
}

/// Set of watched indices; an index leaves the set once it triggers
#[derive(Debug, Clone)]
struct Watch {
    options: ObserverOptions,
    observed: BTreeSet<usize>,
}

impl Watch {
    fn new(options: ObserverOptions, len: usize) -> Self {
        Self {
            options,
            observed: (0..len).collect(),
        }
    }

    fn take(&mut self, entries: &[IntersectionEntry]) -> Vec<usize> {
        let mut hits = Vec::new();
        for entry in entries {
            if self.options.is_intersecting(entry.ratio) && self.observed.remove(&entry.target) {
                hits.push(entry.target);
            }
        }
        hits
    }
}

/// Reveals cards as they scroll into view
#[derive(Debug, Clone)]
pub struct CardObserver {
    watch: Watch,
}

impl CardObserver {
    /// Observe every card of `grid`
    pub fn new(options: ObserverOptions, grid: &GridModel) -> Self {
        Self {
            watch: Watch::new(options, grid.len()),
        }
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.watch.options
    }

    pub fn is_observing(&self, index: usize) -> bool {
        self.watch.observed.contains(&index)
    }

    /// Mark intersecting cards visible and stop observing them
    pub fn handle(&mut self, entries: &[IntersectionEntry], grid: &mut GridModel) -> Vec<usize> {
        let hits = self.watch.take(entries);
        for &index in &hits {
            if let Some(card) = grid.cards.get_mut(index) {
                card.visible = true;
            }
        }
        hits
    }
}

/// Swaps real thumbnails in ahead of the viewport
#[derive(Debug, Clone)]
pub struct ImageObserver {
    watch: Watch,
}

impl ImageObserver {
    pub fn new(options: ObserverOptions, grid: &GridModel) -> Self {
        Self {
            watch: Watch::new(options, grid.len()),
        }
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.watch.options
    }

    pub fn is_observing(&self, index: usize) -> bool {
        self.watch.observed.contains(&index)
    }

    /// Request intersecting images and stop observing them
    pub fn handle(&mut self, entries: &[IntersectionEntry], grid: &mut GridModel) -> Vec<usize> {
        let hits = self.watch.take(entries);
        for &index in &hits {
            if let Some(card) = grid.cards.get_mut(index) {
                card.image.request();
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::AssetPaths;

    fn grid() -> GridModel {
        let catalog = Catalog::builtin(&AssetPaths::default());
        GridModel::build(catalog.entries())
    }

    fn hit(target: usize, ratio: f64) -> IntersectionEntry {
        IntersectionEntry { target, ratio }
    }

    #[test]
    fn test_intersection_ratio() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let none = RootMargin::default();

        assert_eq!(intersection_ratio(Rect::new(0.0, 100.0, 100.0, 100.0), viewport, none), 1.0);
        assert_eq!(intersection_ratio(Rect::new(0.0, 750.0, 100.0, 100.0), viewport, none), 0.5);
        assert_eq!(intersection_ratio(Rect::new(0.0, 900.0, 100.0, 100.0), viewport, none), 0.0);

        // 200px margin pulls a card below the fold into range
        let below = Rect::new(0.0, 900.0, 100.0, 100.0);
        assert_eq!(intersection_ratio(below, viewport, RootMargin::uniform(200.0)), 1.0);

        // Negative bottom margin shrinks the root
        let edge = Rect::new(0.0, 760.0, 100.0, 40.0);
        assert_eq!(intersection_ratio(edge, viewport, ObserverOptions::cards().root_margin), 0.0);
    }

    #[test]
    fn test_card_observer_triggers_once() {
        let mut grid = grid();
        let mut observer = CardObserver::new(ObserverOptions::cards(), &grid);

        // Below threshold: nothing happens
        assert!(observer.handle(&[hit(0, 0.05)], &mut grid).is_empty());
        assert!(!grid.card(0).unwrap().visible);

        assert_eq!(observer.handle(&[hit(0, 0.5), hit(2, 1.0)], &mut grid), vec![0, 2]);
        assert!(grid.card(0).unwrap().visible);
        assert!(!grid.card(1).unwrap().visible);
        assert!(!observer.is_observing(0));

        // Already triggered
        assert!(observer.handle(&[hit(0, 1.0)], &mut grid).is_empty());
    }

    #[test]
    fn test_image_observer_swaps_sources() {
        let mut grid = grid();
        let mut observer = ImageObserver::new(ObserverOptions::images(), &grid);

        let before = grid.card(1).unwrap().image.clone();
        assert_eq!(before.src, PLACEHOLDER_SRC);
        assert_eq!(before.srcset, None);

        assert_eq!(observer.handle(&[hit(1, 0.02)], &mut grid), vec![1]);
        let image = &grid.card(1).unwrap().image;
        assert_eq!(image.state, ImageState::Requested);
        assert_eq!(image.src, "/optimized/thumbs/fta-national-route-map-en.png");
        assert_eq!(
            image.srcset.as_deref(),
            Some("/optimized/thumbs-webp/fta-national-route-map-en.webp")
        );
        assert!(!image.placeholder_hidden);

        assert!(observer.handle(&[hit(1, 1.0)], &mut grid).is_empty());
    }

    #[test]
    fn test_load_event_hides_placeholder_only_after_request() {
        let mut grid = grid();
        let mut observer = ImageObserver::new(ObserverOptions::images(), &grid);

        assert!(!grid.image_loaded(3));
        assert!(!grid.card(3).unwrap().image.placeholder_hidden);

        observer.handle(&[hit(3, 0.5)], &mut grid);
        assert!(grid.image_loaded(3));
        assert!(grid.card(3).unwrap().image.placeholder_hidden);
        assert_eq!(grid.card(3).unwrap().image.state, ImageState::Loaded);

        // A second load event changes nothing
        assert!(!grid.image_loaded(3));
        assert!(!grid.image_loaded(99));
    }
}
