//! Format conversion chores.
//!
//! Three whole-tree maintenance jobs that sit alongside the rendition
//! pipeline:
//!
//! | Chore | Input | Output |
//! |---|---|---|
//! | [`to_webp`] | original PNGs under every PNG root | `x.png` → `x.webp` |
//! | [`colors_to_png`] | WebP swatches in the shared colors directory | `x.webp` → `x.png` |
//! | [`clean_png`] | every PNG under every PNG root | deleted when `x.webp` exists |
//!
//! Conversions keep the image size and use the same idempotent unit of work
//! as renditions, so they are safe to re-run.

use crate::config::AssetConfig;
use crate::imaging::{Encoding, ImageBackend, Quality, RustBackend, ensure_conversion, is_present};
use crate::naming::{self, ImageFormat};
use crate::process::{ProcessError, find_images, report, worker_pool};
use crate::types::{ProcessEvent, RunStats};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

fn is_rendition(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| naming::is_rendition_name(&n.to_string_lossy()))
}

/// Files of `format` under all `roots`, de-duplicated and sorted.
fn collect(roots: &[PathBuf], format: ImageFormat, include_renditions: bool) -> Vec<PathBuf> {
    roots
        .iter()
        .flat_map(|root| find_images(root, &[format]))
        .filter(|p| include_renditions || !is_rendition(p))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Convert each source to its sibling in `encoding`'s format on the pool.
fn convert_all(
    backend: &impl ImageBackend,
    sources: &[PathBuf],
    encoding: Encoding,
    threads: usize,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunStats, ProcessError> {
    let pool = worker_pool(threads)?;
    let events = events.as_ref();

    // `x.png` and `x.PNG` share an output; the first source keeps it.
    let mut seen = HashSet::new();
    let units: Vec<(&PathBuf, PathBuf)> = sources
        .iter()
        .map(|source| (source, naming::sibling_path(source, encoding.format())))
        .filter(|(_, output)| seen.insert(output.clone()))
        .collect();

    Ok(pool.install(|| {
        units
            .par_iter()
            .map(|(source, output)| {
                let outcome = ensure_conversion(backend, source, output, encoding);
                report(events, output, &outcome);
                RunStats::from_outcome(&outcome)
            })
            .reduce(RunStats::default, RunStats::merge)
    }))
}

/// Give every original PNG under `roots` a WebP sibling.
pub fn to_webp_with_backend(
    backend: &impl ImageBackend,
    roots: &[PathBuf],
    quality: Quality,
    threads: usize,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunStats, ProcessError> {
    let sources = collect(roots, ImageFormat::Png, false);
    convert_all(backend, &sources, Encoding::WebP(quality), threads, events)
}

/// Give every WebP swatch under `colors_dir` a PNG sibling.
pub fn colors_to_png_with_backend(
    backend: &impl ImageBackend,
    colors_dir: &Path,
    threads: usize,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunStats, ProcessError> {
    let sources = collect(&[colors_dir.to_path_buf()], ImageFormat::WebP, false);
    convert_all(backend, &sources, Encoding::Png, threads, events)
}

pub fn to_webp(
    config: &AssetConfig,
    root: &Path,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunStats, ProcessError> {
    to_webp_with_backend(
        &RustBackend::new(),
        &config.png_roots(root),
        Quality::new(config.images.quality),
        crate::config::effective_threads(&config.processing),
        events,
    )
}

pub fn colors_to_png(
    config: &AssetConfig,
    root: &Path,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunStats, ProcessError> {
    colors_to_png_with_backend(
        &RustBackend::new(),
        &config.global_colors_dir(root),
        crate::config::effective_threads(&config.processing),
        events,
    )
}

/// Delete every PNG under `roots` (renditions included) that has a
/// non-empty WebP sibling. Returns how many were removed.
///
/// PNGs that cannot be removed are left in place silently.
pub fn clean_png_in(roots: &[PathBuf], events: Option<Sender<ProcessEvent>>) -> u32 {
    let mut removed = 0;
    for png in collect(roots, ImageFormat::Png, true) {
        if !is_present(&naming::sibling_path(&png, ImageFormat::WebP)) {
            continue;
        }
        if std::fs::remove_file(&png).is_ok() {
            removed += 1;
            if let Some(tx) = &events {
                tx.send(ProcessEvent::Removed { path: png }).ok();
            }
        }
    }
    removed
}

pub fn clean_png(config: &AssetConfig, root: &Path, events: Option<Sender<ProcessEvent>>) -> u32 {
    clean_png_in(&config.png_roots(root), events)
}
