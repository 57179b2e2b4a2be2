//! Theme preference: resolution at startup and persistence

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::state::Theme;
use crate::error::{GalleryError, Result};

/// Storage key holding `"dark"` or `"light"`
pub const THEME_KEY: &str = "theme";

/// Key/value string storage, the equivalent of browser local storage
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Pick the theme for a fresh page view.
///
/// An explicit stored preference wins, then the system color scheme,
/// then light. Unknown stored values count as "light"; an empty value
/// counts as nothing stored.
pub fn resolve_initial(stored: Option<&str>, prefers_dark: bool) -> Theme {
    match stored {
        Some("dark") => Theme::Dark,
        Some(value) if !value.is_empty() => Theme::Light,
        _ if prefers_dark => Theme::Dark,
        _ => Theme::Light,
    }
}

/// Read the stored theme and resolve it
pub fn load_theme(store: &impl PreferenceStore, prefers_dark: bool) -> Theme {
    let stored = store.get(THEME_KEY);
    resolve_initial(stored.as_deref(), prefers_dark)
}

/// Persist the theme under [`THEME_KEY`]
pub fn save_theme(store: &mut impl PreferenceStore, theme: Theme) -> Result<()> {
    store.set(THEME_KEY, theme.as_str())
}

/// In-memory store, lost when dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept in a small JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; a
    /// corrupt one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable preferences");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(GalleryError::io(&path, e)),
        };
        debug!(path = %path.display(), keys = values.len(), "Opened preference store");
        Ok(Self { path, values })
    }

    /// Where preferences live by default:
    /// - Linux: ~/.config/transit-map-gallery/preferences.json
    /// - macOS: ~/Library/Application Support/transit-map-gallery/preferences.json
    /// - Windows: %APPDATA%\transit-map-gallery\preferences.json
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs_next::config_dir()
            .or_else(dirs_next::home_dir)
            .ok_or_else(|| {
                GalleryError::Preferences("could not determine config directory".to_string())
            })?;
        path.push("transit-map-gallery");
        path.push("preferences.json");
        Ok(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| GalleryError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json).map_err(|e| GalleryError::io(&self.path, e))
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
