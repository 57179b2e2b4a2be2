//! Resize and encode helpers shared by the three derivative passes

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use image::codecs::png::{FilterType as PngFilter, PngEncoder};
use image::{imageops::FilterType, DynamicImage};

use crate::config::PngCompression;
use crate::error::{GalleryError, Result};

/// Downscale to `max_width` keeping the aspect ratio.
///
/// Images that already fit are returned untouched (never upscaled).
pub fn thumbnail(img: &DynamicImage, max_width: u32) -> Cow<'_, DynamicImage> {
    if img.width() <= max_width {
        return Cow::Borrowed(img);
    }
    // Height bound is open so the width is always the limiting side
    Cow::Owned(img.resize(max_width, u32::MAX, FilterType::Lanczos3))
}

/// Encode as PNG with the given compression effort
pub fn encode_png(img: &DynamicImage, compression: PngCompression) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buf, compression.into(), PngFilter::Adaptive);
    img.write_with_encoder(encoder)?;
    Ok(buf)
}

/// Encode as lossy WebP at `quality` (0-100).
///
/// Alpha is kept when the source has it; opaque images go through the
/// cheaper RGB path.
pub fn encode_webp(img: &DynamicImage, quality: f32) -> Result<Vec<u8>> {
    let quality = quality.clamp(0.0, 100.0);
    let (width, height) = (img.width(), img.height());

    let memory = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_simple(false, quality)
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_simple(false, quality)
    }
    .map_err(|e| GalleryError::WebpEncode(format!("{e:?}")))?;

    Ok(memory.to_vec())
}

/// Write encoded bytes and return how many were written
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<u64> {
    fs::write(path, bytes).map_err(|e| GalleryError::io(path, e))?;
    Ok(bytes.len() as u64)
}
