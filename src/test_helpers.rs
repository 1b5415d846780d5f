//! Shared test utilities for the catalog-assets test suite.
//!
//! Fixture builders for product trees and tiny real images, plus a listing
//! helper so tests can assert on the exact set of files a chore left behind.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! touch(&tmp.path().join("A/C001.png"));
//! write_file(&tmp.path().join("A/info.json"), r#"{"nombre":"Mesa"}"#);
//!
//! assert_eq!(relative_files(tmp.path()), vec!["A/C001.png", "A/info.json"]);
//! ```

use image::{DynamicImage, Rgb, RgbImage};
use std::path::Path;
use walkdir::WalkDir;

// =========================================================================
// Fixture files
// =========================================================================

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// Create a small non-empty placeholder file. Contents are not an image.
pub fn touch(path: &Path) {
    write_file(path, b"placeholder");
}

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

/// Write a real PNG of the given size.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    gradient(width, height).save(path).unwrap();
}

/// Write a real (lossless) WebP of the given size.
pub fn create_test_webp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::WebP)
        .unwrap();
}

// =========================================================================
// Tree inspection
// =========================================================================

/// Every file under `root`, relative and `/`-separated, sorted.
pub fn relative_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}
