//! Build configuration.
//!
//! Handles loading, validating, and merging the optional `assets.toml` file
//! that sits in the project root. Stock defaults reproduce the storefront's
//! conventional layout, so most projects never need the file at all.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! products = "assets/productos"     # Product image tree
//! colors_dir = "colores"            # Reserved subdirectory for shared colors
//! catalog = "assets/catalogo.json"  # Catalog manifest output
//! png_roots = ["assets/productos", "productos"]
//!
//! [catalog]
//! base_url = "/assets/"
//! metadata_file = "info.json"
//!
//! [images]
//! widths = [200, 400, 800, 1200]    # Rendition widths, in pixels
//! quality = 90                      # WEBP quality (1-100)
//!
//! [processing]
//! max_processes = 4                 # Worker pool size (capped at CPU cores)
//! ```
//!
//! Every path is relative to the project root passed on the command line.
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the project root.
pub const CONFIG_FILENAME: &str = "assets.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration for every asset chore.
///
/// All fields have defaults; user files only specify overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetConfig {
    /// Where inputs and outputs live.
    pub paths: PathsConfig,
    /// Catalog manifest settings.
    pub catalog: CatalogConfig,
    /// Rendition and conversion encoding settings.
    pub images: ImagesConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl AssetConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.widths.is_empty() {
            return Err(ConfigError::Validation(
                "images.widths must not be empty".into(),
            ));
        }
        if self.images.widths.contains(&0) {
            return Err(ConfigError::Validation(
                "images.widths values must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.paths.colors_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "paths.colors_dir must not be empty".into(),
            ));
        }
        if self.catalog.metadata_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.metadata_file must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Absolute-ish path of the product tree under `root`.
    pub fn products_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.products)
    }

    /// Shared colors directory (`<products>/<colors_dir>`).
    pub fn global_colors_dir(&self, root: &Path) -> PathBuf {
        self.products_dir(root).join(&self.paths.colors_dir)
    }

    pub fn catalog_path(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.catalog)
    }

    pub fn png_roots(&self, root: &Path) -> Vec<PathBuf> {
        self.paths.png_roots.iter().map(|p| root.join(p)).collect()
    }
}

/// Input and output locations, relative to the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Root of the product image tree. Each immediate subdirectory is a product.
    pub products: String,
    /// Name of the reserved subdirectory holding shared color swatches.
    /// Compared case-insensitively and never treated as a product.
    pub colors_dir: String,
    /// Output path of the catalog manifest.
    pub catalog: String,
    /// Trees searched by `to-webp` and `clean-png`.
    pub png_roots: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            products: "assets/productos".to_string(),
            colors_dir: "colores".to_string(),
            catalog: "assets/catalogo.json".to_string(),
            png_roots: vec!["assets/productos".to_string(), "productos".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Value of the manifest's `baseUrl` field.
    pub base_url: String,
    /// Per-product metadata sidecar, matched case-insensitively.
    pub metadata_file: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "/assets/".to_string(),
            metadata_file: "info.json".to_string(),
        }
    }
}

/// Rendition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Target pixel widths. Widths larger than the original are skipped.
    pub widths: Vec<u32>,
    /// WEBP encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            widths: vec![200, 400, 800, 1200],
            quality: 90,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of concurrent image encodes.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_processes: Some(4),
        }
    }
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AssetConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but is
/// not valid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AssetConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AssetConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<AssetConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `assets.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Catalog Assets Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Paths are relative to the project root.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Paths
# ---------------------------------------------------------------------------
[paths]
# Product image tree. Every immediate subdirectory is one product.
products = "assets/productos"

# Reserved subdirectory of `products` holding shared color swatches.
colors_dir = "colores"

# Where the catalog manifest is written.
catalog = "assets/catalogo.json"

# Trees searched by `to-webp` and `clean-png`.
png_roots = ["assets/productos", "productos"]

# ---------------------------------------------------------------------------
# Catalog manifest
# ---------------------------------------------------------------------------
[catalog]
# Emitted verbatim as the manifest's "baseUrl".
base_url = "/assets/"

# Per-product metadata file (searched recursively, case-insensitive).
metadata_file = "info.json"

# ---------------------------------------------------------------------------
# Responsive renditions
# ---------------------------------------------------------------------------
[images]
# Target pixel widths. Originals narrower than a width are never upscaled.
widths = [200, 400, 800, 1200]

# WEBP encoding quality (1 = worst, 100 = best). PNG output always uses
# maximum compression.
quality = 90

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum concurrent image encodes (capped at the number of CPU cores).
max_processes = 4
"##
}
