//! The page surface the viewer writes to

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Filter;

/// Operations the viewer performs on the page.
///
/// A browser binding maps these onto the DOM; [`StaticDocument`] keeps
/// them in memory for export and tests.
pub trait Document {
    /// Replace the children of element `id`. Returns false when the
    /// element does not exist, in which case nothing changes.
    fn set_inner_html(&mut self, id: &str, html: &str) -> bool;

    /// Add or remove a class on the root (`<html>`) element
    fn set_root_class(&mut self, class: &str, enabled: bool);

    fn set_theme_icon(&mut self, glyph: &str);

    /// Move the `active` class to the button of `filter`
    fn set_active_filter(&mut self, filter: Filter);

    /// Add `class` to every rendered card
    fn add_card_class(&mut self, class: &str);
}

/// In-memory page.
///
/// Elements are known by id. Setting an element's HTML registers the ids
/// found inside it as child elements; [`StaticDocument::serialize`]
/// splices each child's content back into its (empty) container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticDocument {
    elements: BTreeMap<String, String>,
    children: BTreeMap<String, Vec<String>>,
    root_classes: BTreeSet<String>,
    theme_icon: Option<String>,
    active_filter: Option<Filter>,
    card_classes: BTreeSet<String>,
}

impl StaticDocument {
    /// A page with a single empty mount element
    pub fn with_mount(id: &str) -> Self {
        let mut doc = Self::default();
        doc.elements.insert(id.to_string(), String::new());
        doc
    }

    /// A page with no elements at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn inner_html(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(String::as_str)
    }

    pub fn has_root_class(&self, class: &str) -> bool {
        self.root_classes.contains(class)
    }

    pub fn theme_icon(&self) -> Option<&str> {
        self.theme_icon.as_deref()
    }

    pub fn active_filter(&self) -> Option<Filter> {
        self.active_filter
    }

    pub fn card_has_class(&self, class: &str) -> bool {
        self.card_classes.contains(class)
    }

    /// Element `id` with every registered child's content spliced in
    pub fn serialize(&self, id: &str) -> Option<String> {
        let mut html = self.elements.get(id)?.clone();
        for child in self.children.get(id).into_iter().flatten() {
            let Some(content) = self.serialize(child) else {
                continue;
            };
            let marker = format!(r#"id="{child}">"#);
            if let Some(pos) = html.find(&marker) {
                html.insert_str(pos + marker.len(), &content);
            }
        }
        Some(html)
    }

    fn remove_subtree(&mut self, id: &str) {
        if let Some(children) = self.children.remove(id) {
            for child in children {
                self.elements.remove(&child);
                self.remove_subtree(&child);
            }
        }
    }
}

/// Values of every `id="..."` attribute in `html`
fn element_ids(html: &str) -> Vec<String> {
    const MARKER: &str = r#" id=""#;
    let mut ids = Vec::new();
    let mut rest = html;
    while let Some(start) = rest.find(MARKER) {
        rest = &rest[start + MARKER.len()..];
        if let Some(end) = rest.find('"') {
            ids.push(rest[..end].to_string());
            rest = &rest[end..];
        }
    }
    ids
}

impl Document for StaticDocument {
    fn set_inner_html(&mut self, id: &str, html: &str) -> bool {
        if !self.elements.contains_key(id) {
            return false;
        }

        // The old subtree goes away with the old markup
        self.remove_subtree(id);
        self.card_classes.clear();

        let ids = element_ids(html);
        for child in &ids {
            self.elements.insert(child.clone(), String::new());
        }
        self.children.insert(id.to_string(), ids);
        self.elements.insert(id.to_string(), html.to_string());
        true
    }

    fn set_root_class(&mut self, class: &str, enabled: bool) {
        if enabled {
            self.root_classes.insert(class.to_string());
        } else {
            self.root_classes.remove(class);
        }
    }

    fn set_theme_icon(&mut self, glyph: &str) {
        self.theme_icon = Some(glyph.to_string());
        const OPEN: &str = r#"<span class="theme-toggle-icon">"#;
        for html in self.elements.values_mut() {
            let Some(start) = html.find(OPEN).map(|i| i + OPEN.len()) else {
                continue;
            };
            if let Some(len) = html[start..].find("</span>") {
                html.replace_range(start..start + len, glyph);
            }
        }
    }

    fn set_active_filter(&mut self, filter: Filter) {
        self.active_filter = Some(filter);
        let target = format!(r#"data-filter="{filter}""#);
        for html in self.elements.values_mut() {
            *html = edit_classes(html, FILTER_BUTTON_CLASS, |classes, rest| {
                let active = rest.starts_with(&target);
                classes.retain(|c| *c != ACTIVE_CLASS);
                if active {
                    classes.push(ACTIVE_CLASS.to_string());
                }
            });
        }
    }

    fn add_card_class(&mut self, class: &str) {
        self.card_classes.insert(class.to_string());
        for html in self.elements.values_mut() {
            *html = edit_classes(html, CARD_CLASS, |classes, _| {
                if !classes.iter().any(|c| c == class) {
                    classes.push(class.to_string());
                }
            });
        }
    }
}

const FILTER_BUTTON_CLASS: &str = "filter-btn";
const ACTIVE_CLASS: &str = "active";
const CARD_CLASS: &str = "map-card";

/// Rewrite the `class` attribute of every element whose first class is
/// `base`. `edit` gets the class list and the markup following the
/// attribute (`" data-x=..."`).
fn edit_classes(html: &str, base: &str, mut edit: impl FnMut(&mut Vec<String>, &str)) -> String {
    const MARKER: &str = r#"class=""#;
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find(MARKER) {
        let value_start = start + MARKER.len();
        let Some(len) = rest[value_start..].find('"') else {
            break;
        };
        let value = &rest[value_start..value_start + len];
        let after = &rest[value_start + len + 1..];

        out.push_str(&rest[..value_start]);
        if value.split_whitespace().next() == Some(base) {
            let mut classes: Vec<String> = value.split_whitespace().map(str::to_string).collect();
            edit(&mut classes, after.trim_start());
            out.push_str(&classes.join(" "));
        } else {
            out.push_str(value);
        }
        out.push('"');
        rest = after;
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_mount_is_a_no_op() {
        let mut doc = StaticDocument::empty();
        assert!(!doc.set_inner_html("app", "<p>hi</p>"));
        assert_eq!(doc.inner_html("app"), None);
    }

    #[test]
    fn test_children_are_registered_and_spliced() {
        let mut doc = StaticDocument::with_mount("app");
        assert!(doc.set_inner_html("app", r#"<div class="grid" id="gallery"></div>"#));
        assert_eq!(doc.inner_html("gallery"), Some(""));

        assert!(doc.set_inner_html("gallery", "<p>card</p>"));
        assert_eq!(
            doc.serialize("app").unwrap(),
            r#"<div class="grid" id="gallery"><p>card</p></div>"#
        );

        // Re-rendering the parent drops the old child content
        assert!(doc.set_inner_html("app", "<p>empty</p>"));
        assert_eq!(doc.inner_html("gallery"), None);
        assert!(!doc.set_inner_html("gallery", "<p>card</p>"));
    }

    #[test]
    fn test_active_filter_moves_in_markup() {
        let mut doc = StaticDocument::with_mount("app");
        doc.set_inner_html(
            "app",
            r#"<button class="filter-btn active" data-filter="all">All</button><button class="filter-btn" data-filter="city">City</button>"#,
        );

        doc.set_active_filter(Filter::Category(crate::catalog::Category::City));
        assert_eq!(
            doc.inner_html("app").unwrap(),
            r#"<button class="filter-btn" data-filter="all">All</button><button class="filter-btn active" data-filter="city">City</button>"#
        );
    }

    #[test]
    fn test_theme_icon_is_replaced() {
        let mut doc = StaticDocument::with_mount("app");
        doc.set_inner_html("app", r#"<button><span class="theme-toggle-icon">🌙</span></button>"#);
        doc.set_theme_icon("☀️");
        assert_eq!(
            doc.inner_html("app").unwrap(),
            r#"<button><span class="theme-toggle-icon">☀️</span></button>"#
        );
        assert_eq!(doc.theme_icon(), Some("☀️"));
    }

    #[test]
    fn test_card_class_is_added_once() {
        let mut doc = StaticDocument::with_mount("gallery");
        doc.set_inner_html(
            "gallery",
            r#"<div class="map-card" data-index="0"><a class="map-link"></a></div>"#,
        );

        doc.add_card_class("fade-out");
        doc.add_card_class("fade-out");
        assert_eq!(
            doc.inner_html("gallery").unwrap(),
            r#"<div class="map-card fade-out" data-index="0"><a class="map-link"></a></div>"#
        );
        assert!(doc.card_has_class("fade-out"));
    }

    #[test]
    fn test_element_ids() {
        let ids = element_ids(r#"<div id="a"><span id="b"></span><p data-id="c"></p></div>"#);
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }
}
