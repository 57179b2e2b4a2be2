//! HTML rendering of the page and the card grid

use std::fmt::Write;

use super::lazy::PLACEHOLDER_SRC;
use super::lightbox::LightboxOptions;
use super::state::{Theme, ViewerState};
use crate::catalog::{Catalog, CatalogStats, Category, Filter, MapEntry};
use crate::config::ViewerConfig;

/// Element the whole application is rendered into
pub const APP_ID: &str = "app";
/// Element holding the cards, replaced on every filter change
pub const GALLERY_ID: &str = "gallery";
/// Lightbox setup written next to the exported page
pub const LIGHTBOX_MANIFEST_FILE: &str = "lightbox.json";

const GITHUB_ICON_PATH: &str = "M12 0c-6.626 0-12 5.373-12 12 0 5.302 3.438 9.8 8.207 11.387.599.111.793-.261.793-.577v-2.234c-3.338.726-4.033-1.416-4.033-1.416-.546-1.387-1.333-1.756-1.333-1.756-1.089-.745.083-.729.083-.729 1.205.084 1.839 1.237 1.839 1.237 1.07 1.834 2.807 1.304 3.492.997.107-.775.418-1.305.762-1.604-2.665-.305-5.467-1.334-5.467-5.931 0-1.311.469-2.381 1.236-3.221-.124-.303-.535-1.524.117-3.176 0 0 1.008-.322 3.301 1.23.957-.266 1.983-.399 3.003-.404 1.02.005 2.047.138 3.006.404 2.291-1.552 3.297-1.23 3.297-1.23.653 1.653.242 2.874.118 3.176.77.84 1.235 1.911 1.235 3.221 0 4.609-2.807 5.624-5.479 5.921.43.372.823 1.102.823 2.222v3.293c0 .319.192.694.801.576 4.765-1.589 8.199-6.086 8.199-11.386 0-6.627-5.373-12-12-12z";

/// Escape text for use in element content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One grid card. `index` is the card's position in the current grid.
pub fn render_card(entry: &MapEntry, index: usize, lightbox: &LightboxOptions) -> String {
    let badge = match &entry.operator {
        Some(operator) => format!(
            r#"<span class="map-badge badge-{}">{}</span>"#,
            escape_html(&operator.to_lowercase()),
            escape_html(operator)
        ),
        None => String::new(),
    };

    format!(
        r#"<div class="map-card" data-category="{category}" data-index="{index}">
  <a href="{image}" data-pswp-width="{width}" data-pswp-height="{height}" data-pswp-src-webp="{image_webp}" class="map-link" target="_blank">
    <div class="map-image-container">
      <div class="image-placeholder"></div>
      <picture>
        <source type="image/webp" data-src="{thumbnail_webp}">
        <img src="{placeholder}" data-src="{thumbnail}" alt="{title}" class="map-image lazy-image" loading="lazy" />
      </picture>
      <noscript><img src="{thumbnail}" alt="{title}" class="map-image" /></noscript>
      <div class="map-overlay">
        <span class="view-icon">🔍</span>
        <span class="view-text">Click to view full size</span>
      </div>
    </div>
    <div class="map-info">
      {badge}
      <h3 class="map-title">{title}</h3>
      <p class="map-description">{description}</p>
    </div>
  </a>
</div>
"#,
        category = entry.category,
        image = escape_html(&entry.image),
        width = lightbox.slide_width,
        height = lightbox.slide_height,
        image_webp = escape_html(&entry.image_webp),
        thumbnail_webp = escape_html(&entry.thumbnail_webp),
        placeholder = PLACEHOLDER_SRC,
        thumbnail = escape_html(&entry.thumbnail),
        title = escape_html(&entry.title),
        description = escape_html(&entry.description),
    )
}

/// All cards, in the given order
pub fn render_cards(entries: &[&MapEntry], lightbox: &LightboxOptions) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| render_card(entry, index, lightbox))
        .collect()
}

fn filter_label(filter: Filter) -> (&'static str, &'static str) {
    match filter {
        Filter::All => ("🗺️", "All Maps"),
        Filter::Category(Category::National) => ("🌍", "National Routes"),
        Filter::Category(Category::City) => ("🏙️", "City Routes"),
        Filter::Category(Category::Details) => ("📋", "Details"),
    }
}

/// The filter tab bar; `current` carries the `active` class
pub fn render_filters(current: Filter) -> String {
    let mut html = String::from(r#"<div class="filters">"#);
    for tab in Filter::TABS {
        let (icon, label) = filter_label(tab);
        let class = if tab == current {
            "filter-btn active"
        } else {
            "filter-btn"
        };
        let _ = write!(
            html,
            r#"<button class="{class}" data-filter="{tab}"><span class="filter-icon">{icon}</span>{label}</button>"#
        );
    }
    html.push_str("</div>");
    html
}

/// Counters over the whole catalog
pub fn render_stats(stats: &CatalogStats) -> String {
    let cards = [
        (stats.national, "National Maps"),
        (stats.city, "City Routes"),
        (stats.details, "Detail Pages"),
        (stats.total, "Total Maps"),
    ];
    let mut html = String::from(r#"<div class="stats">"#);
    for (value, label) in cards {
        let _ = write!(
            html,
            r#"<div class="stat-card"><div class="stat-value">{value}</div><div class="stat-label">{label}</div></div>"#
        );
    }
    html.push_str("</div>");
    html
}

fn render_header(config: &ViewerConfig, theme: Theme) -> String {
    format!(
        r#"<header class="header">
  <div class="header-content">
    <div class="header-top">
      <h1 class="title"><span class="title-icon">🇪🇹</span>{title}</h1>
      <button class="theme-toggle" aria-label="Toggle dark mode"><span class="theme-toggle-icon">{icon}</span></button>
    </div>
    <p class="subtitle">{subtitle}</p>
  </div>
</header>"#,
        title = escape_html(&config.site_title),
        icon = theme.icon(),
        subtitle = escape_html(&config.subtitle),
    )
}

/// shields.io stars badge for a `https://github.com/<owner>/<repo>` URL
fn github_stars_badge(repository_url: &str) -> Option<String> {
    let path = repository_url
        .strip_prefix("https://github.com/")?
        .trim_end_matches('/');
    let (owner, repo) = path.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some(format!(
        "https://img.shields.io/github/stars/{owner}/{repo}?style=social"
    ))
}

fn render_footer_links(repository_url: &str) -> String {
    let badge = github_stars_badge(repository_url)
        .map(|src| {
            format!(
                r#"
      <div class="github-badge"><img src="{}" alt="GitHub Stars"></div>"#,
                escape_html(&src)
            )
        })
        .unwrap_or_default();
    format!(
        r#"
    <div class="footer-section footer-links">
      <a href="{url}" target="_blank" rel="noopener noreferrer" class="footer-link"><svg width="20" height="20" viewBox="0 0 24 24" fill="currentColor"><path d="{GITHUB_ICON_PATH}"/></svg><span>GitHub</span></a>{badge}
    </div>"#,
        url = escape_html(repository_url),
    )
}

fn render_footer(config: &ViewerConfig, year: i32) -> String {
    let footer = &config.footer;
    let links = footer
        .repository_url
        .as_deref()
        .map(render_footer_links)
        .unwrap_or_default();
    let author = match &footer.author_url {
        Some(url) => format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="author-link">{}</a>"#,
            escape_html(url),
            escape_html(&footer.author_name)
        ),
        None => escape_html(&footer.author_name),
    };

    format!(
        r#"<footer class="footer">
  <div class="footer-content">
    <div class="footer-section">
      <p class="footer-title">© 2019-{year} {title}</p>
      <p class="footer-subtitle">Interactive map viewer built with modern web technologies</p>
    </div>{links}
    <div class="footer-section footer-credits">
      <p class="footer-made-by">Made with <span class="heart">❤️</span> by {author}</p>
      <p class="footer-amharic">{dedication}</p>
    </div>
  </div>
</footer>"#,
        title = escape_html(&config.site_title),
        dedication = escape_html(&footer.dedication),
    )
}

/// Everything the page render needs
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub config: &'a ViewerConfig,
    pub catalog: &'a Catalog,
    pub state: &'a ViewerState,
    /// Year printed in the footer
    pub year: i32,
}

/// Application shell with an empty `#gallery`; cards go in separately
pub fn render_shell(ctx: &PageContext<'_>) -> String {
    format!(
        r#"<div class="app-container">
{header}
{filters}
<div class="maps-grid" id="{GALLERY_ID}"></div>
{stats}
{footer}
</div>"#,
        header = render_header(ctx.config, ctx.state.theme),
        filters = render_filters(ctx.state.current_filter),
        stats = render_stats(&ctx.catalog.stats()),
        footer = render_footer(ctx.config, ctx.year),
    )
}

/// Cards of the current filter
pub fn render_gallery(ctx: &PageContext<'_>) -> String {
    let entries = ctx.catalog.filter(ctx.state.current_filter);
    render_cards(&entries, &ctx.config.lightbox)
}

/// Full HTML document around the rendered `#app` contents.
///
/// The head links the configured stylesheets, preloads the lightbox
/// manifest and loads the configured scripts as modules.
pub fn render_document(app_html: &str, theme: Theme, config: &ViewerConfig) -> String {
    let html_class = if theme.is_dark() { r#" class="dark""# } else { "" };
    let mut head = String::new();
    for href in &config.stylesheets {
        let _ = write!(head, "\n<link rel=\"stylesheet\" href=\"{}\" />", escape_html(href));
    }
    let _ = write!(
        head,
        "\n<link rel=\"preload\" href=\"{LIGHTBOX_MANIFEST_FILE}\" as=\"fetch\" type=\"application/json\" crossorigin />"
    );
    for src in &config.scripts {
        let _ = write!(head, "\n<script type=\"module\" src=\"{}\"></script>", escape_html(src));
    }

    format!(
        r#"<!doctype html>
<html lang="en"{html_class}>
<head>
<meta charset="UTF-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<title>{title}</title>{head}
</head>
<body>
<div id="{APP_ID}">{app_html}</div>
</body>
</html>
"#,
        title = escape_html(&config.site_title),
    )
}
