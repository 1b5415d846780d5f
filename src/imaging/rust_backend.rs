//! Production image backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only) |
//! | Decode (PNG, WebP) | `image` crate decoders |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → WebP | `webp::Encoder` (libwebp, lossy at the given quality) |
//! | Encode → PNG | `image::codecs::png::PngEncoder`, best compression, adaptive filter |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{ConvertParams, Encoding, Quality, ResizeParams};
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Backend built on the `image` and `webp` crates.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the file contents, so a WebP saved with a
/// `.png` extension still decodes.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

fn save_image(img: &DynamicImage, path: &Path, encoding: Encoding) -> Result<(), BackendError> {
    match encoding {
        Encoding::WebP(quality) => save_webp(img, path, quality),
        Encoding::Png => save_png(img, path),
    }
}

/// Encode lossy WebP via libwebp.
///
/// libwebp only accepts 8-bit RGB/RGBA, so everything else is converted
/// first. Alpha is kept only when the source has it.
fn save_webp(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let pixels = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };
    let encoder = webp::Encoder::from_image(&pixels)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encoder setup failed: {e}")))?;
    let encoded = encoder.encode(quality.value() as f32);
    std::fs::write(path, &*encoded)?;
    Ok(())
}

/// Encode in memory, then write in one call so a failed write surfaces as
/// an error instead of leaving a truncated file behind.
fn save_png(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let mut encoded = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut encoded, CompressionType::Best, PngFilter::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))?;
    std::fs::write(path, &encoded)?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to read dimensions of {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_image(&resized, &params.output, params.encoding)
    }

    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        save_image(&img, &params.output, params.encoding)
    }
}
