//! # Catalog Assets
//!
//! Build chores for a storefront's product imagery. The filesystem is the
//! data source: every folder under the product root is a product, swatch
//! images named after their color code (`C010.png`) attach colors to it, and
//! an optional `info.json` carries the rest of its data.
//!
//! # Chores
//!
//! ```text
//! responsive     assets/productos/**   →  C001-200.webp, C001-200.png, ...
//! catalog        assets/productos/     →  assets/catalogo.json
//! to-webp        **/*.png              →  **/*.webp        (same size)
//! colors-to-png  productos/colores/    →  colores/*.png    (same size)
//! clean-png      **/*.png              →  deleted when a .webp sibling exists
//! ```
//!
//! Each chore is independent and idempotent: outputs that already exist are
//! left alone, so re-running after adding one product only touches that
//! product's files.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`process`] | Responsive renditions of every original, on a bounded worker pool |
//! | [`catalog`] | Walks product folders, collects color codes and metadata, writes the manifest |
//! | [`convert`] | Whole-tree format conversions and stale PNG cleanup |
//! | [`config`] | `assets.toml` loading, merging over stock defaults, validation |
//! | [`naming`] | Color code and rendition filename conventions |
//! | [`imaging`] | Image backend trait, the `image`/`webp` implementation, the idempotent unit of work |
//! | [`types`] | Progress events and run counters shared by the image chores |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## No Upscaling
//!
//! A rendition width larger than its original is skipped and counted, never
//! produced. The storefront's `srcset` simply lists fewer candidates for
//! small originals.
//!
//! ## Existence Is The Cache
//!
//! There is no manifest of processed files. A non-empty file at the output
//! path means the work is done; a failed encode removes its partial output
//! so the next run retries it. Deleting a rendition is all it takes to
//! regenerate it.
//!
//! ## In-Process Encoding
//!
//! Decoding, resizing and PNG encoding use the `image` crate; lossy WebP uses
//! libwebp through the `webp` crate. No external binaries are needed.
//!
//! ## Deterministic Catalog
//!
//! Directory walks are sorted and every color list is sorted, so the same tree
//! always produces a byte-identical `catalogo.json`. Metadata key order is kept
//! as written in `info.json`.

pub mod catalog;
pub mod config;
pub mod convert;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
