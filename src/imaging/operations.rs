//! High-level image operations.
//!
//! Every file the chores write goes through [`ensure_output`], the single
//! idempotent unit of work:
//!
//! 1. A non-empty file already at the output path → [`Outcome::Existing`],
//!    nothing is touched.
//! 2. Otherwise the backend writes it. An error, or a zero-byte result,
//!    removes whatever was written → [`Outcome::Failed`].
//! 3. Otherwise → [`Outcome::Created`].
//!
//! Failures are returned, never raised, so one bad source cannot stop a batch.
//! A failed unit is simply retried by the next run.

use super::backend::{BackendError, ImageBackend};
use super::calculations::RenditionSize;
use super::params::{ConvertParams, Encoding, ResizeParams};
use std::path::Path;

/// Result of one unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    /// A valid output was already present.
    Existing,
    /// Generation failed; any partial output was removed.
    Failed(String),
}

/// Whether `path` is a regular file with at least one byte.
pub fn is_present(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

fn remove_partial(path: &Path) {
    // Nothing to remove is fine.
    std::fs::remove_file(path).ok();
}

/// Produce `output` with `produce` unless a valid file is already there.
pub fn ensure_output(
    output: &Path,
    produce: impl FnOnce() -> Result<(), BackendError>,
) -> Outcome {
    if is_present(output) {
        return Outcome::Existing;
    }

    if let Err(e) = produce() {
        remove_partial(output);
        return Outcome::Failed(e.to_string());
    }

    if !is_present(output) {
        remove_partial(output);
        return Outcome::Failed("encoder produced an empty file".to_string());
    }

    Outcome::Created
}

/// Write one resized rendition of `source` to `output`.
pub fn ensure_rendition(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    size: RenditionSize,
    encoding: Encoding,
) -> Outcome {
    ensure_output(output, || {
        backend.resize(&ResizeParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            width: size.width,
            height: size.height,
            encoding,
        })
    })
}

/// Re-encode `source` at its own size into `output`.
pub fn ensure_conversion(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    encoding: Encoding,
) -> Outcome {
    ensure_output(output, || {
        backend.convert(&ConvertParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            encoding,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::params::Quality;
    use std::fs;
    use tempfile::TempDir;

    const SIZE: RenditionSize = RenditionSize {
        width: 200,
        height: 100,
    };

    #[test]
    fn is_present_requires_non_empty_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.webp");
        assert!(!is_present(&path));

        fs::write(&path, b"").unwrap();
        assert!(!is_present(&path));

        fs::write(&path, b"x").unwrap();
        assert!(is_present(&path));

        // Directories don't count
        assert!(!is_present(tmp.path()));
    }

    #[test]
    fn creates_missing_rendition() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("C001-200.webp");
        let backend = MockBackend::new();

        let outcome = ensure_rendition(
            &backend,
            &tmp.path().join("C001.png"),
            &output,
            SIZE,
            Encoding::WebP(Quality::default()),
        );

        assert_eq!(outcome, Outcome::Created);
        assert!(is_present(&output));
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Resize {
                width: 200,
                height: 100,
                ..
            }
        ));
    }

    #[test]
    fn existing_rendition_is_left_alone() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("C001-200.webp");
        fs::write(&output, b"already here").unwrap();
        let backend = MockBackend::new();

        let outcome = ensure_rendition(
            &backend,
            &tmp.path().join("C001.png"),
            &output,
            SIZE,
            Encoding::WebP(Quality::default()),
        );

        assert_eq!(outcome, Outcome::Existing);
        assert!(backend.get_operations().is_empty());
        assert_eq!(fs::read(&output).unwrap(), b"already here");
    }

    #[test]
    fn zero_byte_output_is_regenerated() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("C001-200.png");
        fs::write(&output, b"").unwrap();
        let backend = MockBackend::new();

        let outcome = ensure_rendition(
            &backend,
            &tmp.path().join("C001.png"),
            &output,
            SIZE,
            Encoding::Png,
        );

        assert_eq!(outcome, Outcome::Created);
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn empty_result_is_removed() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("C001-200.webp");
        let backend = MockBackend::new().empty_outputs();

        let outcome = ensure_rendition(
            &backend,
            &tmp.path().join("C001.png"),
            &output,
            SIZE,
            Encoding::WebP(Quality::default()),
        );

        assert!(matches!(outcome, Outcome::Failed(_)));
        assert!(!output.exists());
    }

    #[test]
    fn backend_failure_removes_partial_output() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("C001.webp");

        let outcome = ensure_output(&output, || {
            fs::write(&output, b"half")?;
            Err(BackendError::ProcessingFailed("encoder crashed".into()))
        });

        assert_eq!(outcome, Outcome::Failed("Processing failed: encoder crashed".into()));
        assert!(!output.exists());
    }

    #[test]
    fn conversion_uses_convert_operation() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("C010.webp");
        let output = tmp.path().join("C010.png");
        let backend = MockBackend::new();

        let outcome = ensure_conversion(&backend, &source, &output, Encoding::Png);

        assert_eq!(outcome, Outcome::Created);
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Convert {
                encoding: Encoding::Png,
                ..
            }
        ));
    }
}
