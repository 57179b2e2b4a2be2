//! Image optimizer
//!
//! This module handles:
//! - Creating the derivative directory layout
//! - Listing the source PNGs
//! - Generating PNG and WebP thumbnails plus a full-size WebP
//! - Reporting size statistics for the run

pub mod batch;
pub mod encode;
pub mod layout;
pub mod source;

pub use batch::{BatchReport, FileFailure, FileReport, Optimizer};
pub use layout::{DerivativePaths, OutputLayout};
pub use source::list_png_files;
