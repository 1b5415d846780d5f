//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the chores need:
//! identify, resize and convert. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests use the recording
//! `MockBackend` below.

use super::params::{ConvertParams, ResizeParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` because a single backend is shared by every worker in the pool.
pub trait ImageBackend: Sync {
    /// Read image dimensions from the file header.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode, resize to exactly `width`x`height`, encode and write.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Decode and re-encode at the original size.
    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError>;
}
