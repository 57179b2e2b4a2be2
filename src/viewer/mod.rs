//! Transit map viewer
//!
//! The page model behind the gallery:
//! - Page state and the theme preference (state.rs, theme.rs)
//! - HTML rendering of the page and card grid (render.rs)
//! - Viewport-driven lazy loading (lazy.rs)
//! - Lightbox capability and custom actions (lightbox.rs)
//! - The page surface and the controller tying it together (document.rs, app.rs)

pub mod app;
pub mod document;
pub mod lazy;
pub mod lightbox;
pub mod render;
pub mod state;
pub mod theme;

pub use app::{Startup, TransitMapViewer};
pub use document::{Document, StaticDocument};
pub use lightbox::{LightboxHost, LightboxManifest, ManifestHost};
pub use state::{Theme, ViewerState};
pub use theme::{JsonFileStore, MemoryStore, PreferenceStore};
