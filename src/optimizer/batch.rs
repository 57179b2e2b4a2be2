//! Batch driver: one sequential pass over the source folder

use std::path::{Path, PathBuf};

use tracing::{error, info};

use super::encode::{encode_png, encode_webp, thumbnail, write_bytes};
use super::layout::{DerivativePaths, OutputLayout};
use super::source::list_png_files;
use crate::config::OptimizerConfig;
use crate::error::{GalleryError, Result};

/// Sizes and dimensions recorded for one successfully processed file
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub file_name: String,
    pub outputs: DerivativePaths,
    pub original_bytes: u64,
    pub thumb_png_bytes: u64,
    pub thumb_webp_bytes: u64,
    pub full_webp_bytes: u64,
    /// (width, height) of the source
    pub source_dimensions: (u32, u32),
    /// (width, height) of both thumbnails
    pub thumb_dimensions: (u32, u32),
}

/// A file that could not be processed; the batch carried on without it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file_name: String,
    pub message: String,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub processed: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
    /// Directories that did not exist before the run
    pub created_dirs: Vec<PathBuf>,
}

impl BatchReport {
    /// Sum of the source file sizes of processed files
    pub fn total_original_bytes(&self) -> u64 {
        self.processed.iter().map(|r| r.original_bytes).sum()
    }

    /// Sum of the PNG thumbnail sizes
    pub fn total_thumbnail_bytes(&self) -> u64 {
        self.processed.iter().map(|r| r.thumb_png_bytes).sum()
    }

    /// Percentage of the original bytes saved by the PNG thumbnails
    pub fn savings_percent(&self) -> f64 {
        let original = self.total_original_bytes();
        if original == 0 {
            return 0.0;
        }
        let thumbs = self.total_thumbnail_bytes();
        (original as f64 - thumbs as f64) / original as f64 * 100.0
    }
}

/// Converts a folder of PNG route maps into optimized derivatives
#[derive(Debug, Clone)]
pub struct Optimizer {
    config: OptimizerConfig,
    layout: OutputLayout,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        let layout = OutputLayout::new(config.output_dir.clone());
        Self { config, layout }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Run the batch.
    ///
    /// Only a missing source folder or an output tree that cannot be
    /// created aborts the run. Every per-file problem is logged, recorded
    /// in [`BatchReport::failures`] and skipped.
    pub fn run(&self) -> Result<BatchReport> {
        info!("🖼️  Starting image optimization");

        let created_dirs = self.layout.ensure()?;
        let files = list_png_files(&self.config.input_dir)?;
        info!(count = files.len(), input = %self.config.input_dir.display(), "Found PNG files to optimize");

        let mut report = BatchReport {
            created_dirs,
            ..Default::default()
        };

        for path in files {
            let file_name = display_name(&path);
            info!(file = %file_name, "Processing");

            match self.optimize_file(&path) {
                Ok(file_report) => {
                    log_file_report(&file_report);
                    report.processed.push(file_report);
                }
                Err(e) => {
                    error!(file = %file_name, error = %e, "❌ Error processing file");
                    report.failures.push(FileFailure {
                        file_name,
                        message: e.to_string(),
                    });
                }
            }
        }

        log_summary(&report);
        Ok(report)
    }

    /// Produce the three derivatives of a single PNG.
    ///
    /// The source is decoded once; both thumbnails share one resize and the
    /// full-size WebP is encoded from the same decoded image.
    pub fn optimize_file(&self, path: &Path) -> Result<FileReport> {
        let file_name = display_name(path);
        let outputs = self.layout.derivatives(&file_name);

        let original_bytes = std::fs::metadata(path)
            .map_err(|e| GalleryError::io(path, e))?
            .len();

        let img = image::open(path)?;
        let source_dimensions = (img.width(), img.height());

        // 1. Thumbnail PNG for the grid
        let thumb = thumbnail(&img, self.config.thumb_width);
        let thumb_dimensions = (thumb.width(), thumb.height());
        let png = encode_png(&thumb, self.config.png_compression)?;
        let thumb_png_bytes = write_bytes(&outputs.thumb_png, &png)?;

        // 2. Thumbnail WebP for browsers that take it
        let webp = encode_webp(&thumb, self.config.webp_quality)?;
        let thumb_webp_bytes = write_bytes(&outputs.thumb_webp, &webp)?;
        drop(thumb);

        // 3. Full-size WebP for the lightbox
        let full = encode_webp(&img, self.config.webp_quality)?;
        let full_webp_bytes = write_bytes(&outputs.full_webp, &full)?;

        Ok(FileReport {
            file_name,
            outputs,
            original_bytes,
            thumb_png_bytes,
            thumb_webp_bytes,
            full_webp_bytes,
            source_dimensions,
            thumb_dimensions,
        })
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Bytes as megabytes with two decimals
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Bytes as kilobytes with two decimals
pub fn format_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// `part` as a percentage of `whole`, one decimal
pub fn format_ratio(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 / whole as f64 * 100.0)
}

fn log_file_report(r: &FileReport) {
    info!(
        file = %r.file_name,
        original = %format_mb(r.original_bytes),
        thumb_png = %format!("{} ({})", format_kb(r.thumb_png_bytes), format_ratio(r.thumb_png_bytes, r.original_bytes)),
        thumb_webp = %format!("{} ({})", format_kb(r.thumb_webp_bytes), format_ratio(r.thumb_webp_bytes, r.original_bytes)),
        full_webp = %format!("{} ({})", format_mb(r.full_webp_bytes), format_ratio(r.full_webp_bytes, r.original_bytes)),
        "Optimized"
    );
}

fn log_summary(report: &BatchReport) {
    info!(
        processed = report.processed.len(),
        failed = report.failures.len(),
        total_original = %format_mb(report.total_original_bytes()),
        total_thumbnails = %format_kb(report.total_thumbnail_bytes()),
        savings = %format!("{:.1}%", report.savings_percent()),
        "📊 Summary"
    );
    info!("✅ Image optimization complete");
}
