//! CLI output formatting for all chores.
//!
//! # Output Format
//!
//! ## Image chores
//!
//! Progress lines as units finish (paths relative to the project root),
//! then one summary line:
//!
//! ```text
//!     created assets/productos/Mesa/C001-200.webp
//!     failed assets/productos/Mesa/C002-200.png: Processing failed: ...
//! responsive → created: 7, skipped: 3
//! ```
//!
//! ## Catalog
//!
//! ```text
//! Products
//! 001 Banco (0 colors)
//! 002 Mesa Roble (2 colors)
//!     nombre, precio
//!
//! Catalog: assets/catalogo.json (2 products, 4 colors)
//! ```
//!
//! Warnings go to stderr prefixed with `warning:`.
//!
//! # Architecture
//!
//! Each chore has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::CatalogReport;
use crate::types::{ProcessEvent, RunStats};
use std::path::Path;

/// `path` relative to `root` when it lives under it, as-is otherwise.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Image chores
// ============================================================================

/// Format one progress event. Returns no lines for events not worth showing.
pub fn format_process_event(event: &ProcessEvent, root: &Path) -> Vec<String> {
    match event {
        ProcessEvent::Created { path } => {
            vec![format!("    created {}", display_path(path, root))]
        }
        ProcessEvent::Failed { path, reason } => {
            vec![format!("    failed {}: {}", display_path(path, root), reason)]
        }
        ProcessEvent::Unreadable { source, reason } => {
            vec![format!(
                "    unreadable {}: {}",
                display_path(source, root),
                reason
            )]
        }
        ProcessEvent::Removed { path } => {
            vec![format!("    removed {}", display_path(path, root))]
        }
    }
}

pub fn format_run_summary(chore: &str, stats: &RunStats) -> String {
    format!("{} → {}", chore, stats)
}

pub fn print_run_summary(chore: &str, stats: &RunStats) {
    println!("{}", format_run_summary(chore, stats));
}

pub fn format_clean_summary(removed: u32) -> String {
    if removed == 0 {
        "clean-png → nothing to remove".to_string()
    } else {
        format!("clean-png → removed: {}", removed)
    }
}

pub fn print_clean_summary(removed: u32) {
    println!("{}", format_clean_summary(removed));
}

// ============================================================================
// Catalog
// ============================================================================

pub fn format_catalog_output(report: &CatalogReport, root: &Path) -> Vec<String> {
    let manifest = &report.manifest;
    let mut lines = Vec::new();

    if !manifest.products.is_empty() {
        lines.push("Products".to_string());
        for (i, product) in manifest.products.iter().enumerate() {
            lines.push(format!(
                "{:03} {} ({} colors)",
                i + 1,
                product.code,
                product.colors.len()
            ));
            if !product.metadata.is_empty() {
                let keys: Vec<&str> = product.metadata.keys().map(String::as_str).collect();
                lines.push(format!("    {}", keys.join(", ")));
            }
        }
        lines.push(String::new());
    }

    let target = report
        .output
        .as_deref()
        .map(|p| display_path(p, root))
        .unwrap_or_else(|| "(not written)".to_string());
    lines.push(format!(
        "Catalog: {} ({} products, {} colors)",
        target,
        manifest.products.len(),
        manifest.colors.len()
    ));
    lines
}

pub fn format_warnings(warnings: &[String]) -> Vec<String> {
    warnings.iter().map(|w| format!("warning: {}", w)).collect()
}

pub fn print_catalog_output(report: &CatalogReport, root: &Path) {
    for line in format_warnings(&report.warnings) {
        eprintln!("{}", line);
    }
    for line in format_catalog_output(report, root) {
        println!("{}", line);
    }
}
