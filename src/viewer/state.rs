//! Runtime state of one page view

use std::fmt;
use std::str::FromStr;

use crate::catalog::Filter;
use crate::error::GalleryError;

/// Color scheme of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Value written to the preference store
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Glyph on the toggle button: the theme you would switch to
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(GalleryError::Preferences(format!("unknown theme: {other}"))),
        }
    }
}

/// Filter and theme of the current page view.
///
/// Created when the viewer starts and changed only by filter clicks and
/// the theme toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewerState {
    pub current_filter: Filter,
    pub theme: Theme,
}

impl ViewerState {
    pub fn new(current_filter: Filter, theme: Theme) -> Self {
        Self {
            current_filter,
            theme,
        }
    }

    pub fn is_dark_mode(&self) -> bool {
        self.theme.is_dark()
    }
}
