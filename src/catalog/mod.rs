//! Map catalog
//!
//! This module holds the gallery's content:
//! - Map entries and their derived image paths (data.rs)
//! - The catalog itself with filtering and stats (library.rs)
//! - On-demand check that catalog paths exist on disk (verify.rs)

pub mod data;
pub mod library;
pub mod verify;

pub use data::{Category, ImagePaths, MapEntry};
pub use library::{Catalog, CatalogStats, Filter};
pub use verify::{verify_catalog, SiteRoots, VerifyReport};
