//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the pipelines (which decide what files to produce) and
//! the [`backend`](super::backend) (which does the pixel work), so a mock
//! backend can stand in during tests.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Encoding`] — Output codec and its settings.
//! - [`ResizeParams`] — Source, output path, target dimensions, encoding.
//! - [`ConvertParams`] — Same-size re-encode: source, output path, encoding.

use crate::naming::ImageFormat;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Output codec and settings.
///
/// PNG is always written at maximum compression with adaptive row filtering;
/// there is nothing to tune.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    WebP(Quality),
    Png,
}

impl Encoding {
    /// Encoding for a target format, using `quality` where the codec takes one.
    pub fn for_format(format: ImageFormat, quality: Quality) -> Self {
        match format {
            ImageFormat::WebP => Self::WebP(quality),
            ImageFormat::Png => Self::Png,
        }
    }

    pub fn format(self) -> ImageFormat {
        match self {
            Self::WebP(_) => ImageFormat::WebP,
            Self::Png => ImageFormat::Png,
        }
    }
}

/// Parameters for a resize-and-encode operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub encoding: Encoding,
}

/// Parameters for a same-size format conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub encoding: Encoding,
}
