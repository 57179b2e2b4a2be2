//! Static transit route-map gallery.
//!
//! Two parts share nothing but a file-system convention:
//! - [`optimizer`] turns a folder of PNG maps into thumbnails and WebP copies
//! - [`viewer`] renders the catalog as a filterable, lazily loaded grid with
//!   a lightbox, against paths the optimizer produces

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod optimizer;
pub mod viewer;

pub use error::{GalleryError, Result};
