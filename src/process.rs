//! Responsive rendition generation.
//!
//! Walks the product image tree and, for every original, writes resized
//! copies at each configured width next to it.
//!
//! ## Originals
//!
//! Any `.png` or `.webp` file (extension case-insensitive) whose name does not
//! end in `-<digits>.<ext>`. Hidden files and directories are ignored.
//!
//! ## Outputs
//!
//! ```text
//! assets/productos/A/
//! ├── C001.png           # original (PNG)
//! ├── C001-200.webp      # always
//! ├── C001-200.png       # only because the original is a PNG
//! ├── C001-400.webp
//! ├── C001-400.png
//! ├── front.webp         # original (WebP)
//! ├── front-200.webp
//! └── front-400.webp
//! ```
//!
//! Widths larger than the original are skipped, never upscaled. Outputs that
//! already exist with a non-zero size are left alone, so re-running is a
//! no-op once everything has been materialized.
//!
//! ## Parallel Processing
//!
//! Identification and every `(original, width, format)` unit run on a
//! dedicated [rayon](https://docs.rs/rayon) pool of bounded size. Units share
//! no state: counts are reduced from their outcomes and progress goes out
//! over an optional channel.

use crate::config::AssetConfig;
use crate::imaging::{
    Encoding, ImageBackend, Quality, RenditionSize, RustBackend, ensure_rendition, plan_widths,
};
use crate::naming::{self, ImageFormat};
use crate::types::{ProcessEvent, RunStats};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Configuration for rendition generation.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub widths: Vec<u32>,
    pub quality: Quality,
    /// Worker pool size.
    pub threads: usize,
}

impl ProcessConfig {
    pub fn from_config(config: &AssetConfig) -> Self {
        Self {
            widths: config.images.widths.clone(),
            quality: Quality::new(config.images.quality),
            threads: crate::config::effective_threads(&config.processing),
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self::from_config(&AssetConfig::default())
    }
}

/// One file to produce: a single `(original, width, format)` triple.
#[derive(Debug, Clone, PartialEq)]
pub struct RenditionJob {
    pub source: PathBuf,
    pub output: PathBuf,
    pub size: RenditionSize,
    pub encoding: Encoding,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// All images of the given formats under `root`, in sorted walk order.
///
/// A missing `root` yields nothing. Unreadable subdirectories are skipped.
pub fn find_images(root: &Path, formats: &[ImageFormat]) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| ImageFormat::from_path(p).is_some_and(|f| formats.contains(&f)))
        .collect()
}

/// Originals under `root`: PNG and WebP files that are not renditions.
pub fn find_originals(root: &Path) -> Vec<PathBuf> {
    find_images(root, &[ImageFormat::Png, ImageFormat::WebP])
        .into_iter()
        .filter(|p| {
            let name = p.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            !naming::is_rendition_name(&name)
        })
        .collect()
}

/// Plan the renditions of one original of `width`x`height`.
///
/// Returns the jobs plus the number of widths skipped as too large. Each
/// applicable width gets a WebP job and, for PNG originals, a PNG job.
pub fn plan_renditions(
    original: &Path,
    dimensions: (u32, u32),
    config: &ProcessConfig,
) -> (Vec<RenditionJob>, u32) {
    let plan = plan_widths(dimensions, &config.widths);
    let mut formats = vec![ImageFormat::WebP];
    if ImageFormat::from_path(original) == Some(ImageFormat::Png) {
        formats.push(ImageFormat::Png);
    }

    let jobs = plan
        .sizes
        .iter()
        .flat_map(|&size| {
            formats.iter().map(move |&format| RenditionJob {
                source: original.to_path_buf(),
                output: naming::rendition_path(original, size.width, format),
                size,
                encoding: Encoding::for_format(format, config.quality),
            })
        })
        .collect();

    (jobs, plan.too_small)
}

/// Drop jobs whose output an earlier job already writes.
///
/// Originals sharing a stem (`C001.png` and `C001.webp`, or `C001.PNG`) plan
/// the same rendition paths; the first original in walk order keeps them.
pub fn unique_outputs(jobs: Vec<RenditionJob>) -> Vec<RenditionJob> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| seen.insert(job.output.clone()))
        .collect()
}

fn emit(events: Option<&Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A gone printer must not stop the batch.
        tx.send(event).ok();
    }
}

/// Build the bounded pool every image chore runs on.
pub fn worker_pool(threads: usize) -> Result<rayon::ThreadPool, ProcessError> {
    Ok(rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("encode-{i}"))
        .build()?)
}

/// Generate renditions for every original under `root`.
pub fn process(
    root: &Path,
    config: &ProcessConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunStats, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, root, config, events)
}

/// Generate renditions using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    root: &Path,
    config: &ProcessConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunStats, ProcessError> {
    let pool = worker_pool(config.threads)?;
    let originals = find_originals(root);
    let events = events.as_ref();

    let stats = pool.install(|| {
        let planned: Vec<(Vec<RenditionJob>, u32)> = originals
            .par_iter()
            .filter_map(|original| match backend.identify(original) {
                Ok(dims) => Some(plan_renditions(
                    original,
                    (dims.width, dims.height),
                    config,
                )),
                Err(e) => {
                    emit(
                        events,
                        ProcessEvent::Unreadable {
                            source: original.clone(),
                            reason: e.to_string(),
                        },
                    );
                    None
                }
            })
            .collect();

        let mut stats = RunStats::default();
        let mut jobs = Vec::new();
        for (original_jobs, too_small) in planned {
            stats.too_small += too_small;
            jobs.extend(original_jobs);
        }
        let jobs = unique_outputs(jobs);

        jobs.par_iter()
            .map(|job| {
                let outcome =
                    ensure_rendition(backend, &job.source, &job.output, job.size, job.encoding);
                report(events, &job.output, &outcome);
                RunStats::from_outcome(&outcome)
            })
            .reduce(RunStats::default, RunStats::merge)
            .merge(stats)
    });

    Ok(stats)
}

/// Emit the event for a finished unit, if it is worth reporting.
pub(crate) fn report(
    events: Option<&Sender<ProcessEvent>>,
    output: &Path,
    outcome: &crate::imaging::Outcome,
) {
    use crate::imaging::Outcome;
    match outcome {
        Outcome::Created => emit(
            events,
            ProcessEvent::Created {
                path: output.to_path_buf(),
            },
        ),
        Outcome::Failed(reason) => emit(
            events,
            ProcessEvent::Failed {
                path: output.to_path_buf(),
                reason: reason.clone(),
            },
        ),
        Outcome::Existing => {}
    }
}
