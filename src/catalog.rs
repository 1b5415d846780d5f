//! Product catalog manifest.
//!
//! Walks the product tree and writes the JSON manifest the storefront loads.
//!
//! ## Directory Structure
//!
//! ```text
//! assets/productos/
//! ├── colores/                 # shared swatches, never a product
//! │   ├── C010.png
//! │   └── C011.webp
//! ├── Mesa Roble/              # product "Mesa Roble"
//! │   ├── fotos/info.json      # metadata, found anywhere under the product
//! │   ├── C001.png             # swatch directly in the product
//! │   └── colores/
//! │       └── C002.svg         # swatch in the product's colores/
//! └── Silla/
//! ```
//!
//! ## Manifest
//!
//! ```json
//! {
//!   "baseUrl": "/assets/",
//!   "colors": ["C001", "C002", "C010", "C011"],
//!   "products": [
//!     { "nombre": "Mesa", "codigo": "Mesa Roble", "colores": ["C001", "C002"] },
//!     { "codigo": "Silla", "colores": [] }
//!   ]
//! }
//! ```
//!
//! Each product is its metadata object with `codigo` (the folder name) and
//! `colores` laid over it; those two always win over same-named metadata
//! keys. Unreadable or malformed metadata only produces a warning and an
//! empty object.

use crate::config::AssetConfig;
use crate::naming;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to serialize catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings the catalog builder needs from the config.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub base_url: String,
    pub colors_dir: String,
    pub metadata_file: String,
}

impl CatalogOptions {
    pub fn from_config(config: &AssetConfig) -> Self {
        Self {
            base_url: config.catalog.base_url.clone(),
            colors_dir: config.paths.colors_dir.clone(),
            metadata_file: config.catalog.metadata_file.clone(),
        }
    }
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self::from_config(&AssetConfig::default())
    }
}

/// The manifest written to `catalogo.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogManifest {
    pub base_url: String,
    pub colors: Vec<String>,
    pub products: Vec<Product>,
}

impl CatalogManifest {
    pub fn empty(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            colors: Vec::new(),
            products: Vec::new(),
        }
    }
}

/// One product: a folder under the product root.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Folder name, serialized as `codigo`.
    pub code: String,
    /// Sorted, de-duplicated color codes, serialized as `colores`.
    pub colors: Vec<String>,
    /// Metadata object from the sidecar, empty when absent or invalid.
    pub metadata: Map<String, Value>,
}

impl Product {
    /// The JSON object for this product: metadata first, then `codigo` and
    /// `colores`. Overriding a key keeps its original position.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut object = self.metadata.clone();
        object.insert("codigo".to_string(), Value::String(self.code.clone()));
        object.insert(
            "colores".to_string(),
            Value::Array(self.colors.iter().cloned().map(Value::String).collect()),
        );
        object
    }
}

impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Result of building the catalog: the manifest plus non-fatal warnings.
#[derive(Debug)]
pub struct CatalogReport {
    pub manifest: CatalogManifest,
    pub warnings: Vec<String>,
    /// Where the manifest was written, once written.
    pub output: Option<PathBuf>,
}

// ============================================================================
// Building
// ============================================================================

/// Sort color codes case-insensitively, ordinal on ties, without duplicates.
pub fn sort_codes(codes: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut sorted: Vec<String> = codes.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    sorted.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    sorted
}

/// Every color code found in file names anywhere under `dir`.
///
/// A missing directory has no codes. Order follows the sorted walk and may
/// contain duplicates.
pub fn collect_color_codes(dir: &Path) -> Result<Vec<String>, CatalogError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut codes = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        if let Some(code) = naming::color_code(&entry.file_name().to_string_lossy()) {
            codes.push(code);
        }
    }
    Ok(codes)
}

/// First file under `dir` named `file_name` (case-insensitive), in sorted
/// depth-first order.
pub fn find_metadata_file(dir: &Path, file_name: &str) -> Result<Option<PathBuf>, CatalogError> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        if entry
            .file_name()
            .to_string_lossy()
            .eq_ignore_ascii_case(file_name)
        {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}

/// Read a metadata sidecar. Anything but a JSON object yields an empty
/// object and a warning naming `product_dir`.
pub fn load_metadata(path: &Path, product_dir: &Path) -> (Map<String, Value>, Option<String>) {
    let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|raw| serde_json::from_str::<Value>(&raw).map_err(|e| e.to_string()));

    match parsed {
        Ok(Value::Object(map)) => (map, None),
        Ok(_) => (
            Map::new(),
            Some(format!(
                "{} in {} is not a JSON object",
                file_name,
                product_dir.display()
            )),
        ),
        Err(e) => (
            Map::new(),
            Some(format!(
                "Failed to parse {} in {}: {}",
                file_name,
                product_dir.display(),
                e
            )),
        ),
    }
}

/// Names of the product folders under `products_dir`, ordinal order.
///
/// Only real directories count (symlinks are not followed); the colors
/// folder is excluded whatever its case.
pub fn product_folders(products_dir: &Path, colors_dir: &str) -> Result<Vec<String>, CatalogError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(products_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.to_lowercase() == colors_dir.to_lowercase() {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Scan one product folder. Returns the product and any metadata warning.
pub fn scan_product(
    products_dir: &Path,
    folder: &str,
    options: &CatalogOptions,
) -> Result<(Product, Option<String>), CatalogError> {
    let dir = products_dir.join(folder);

    let (metadata, warning) = match find_metadata_file(&dir, &options.metadata_file)? {
        Some(path) => load_metadata(&path, &dir),
        None => (Map::new(), None),
    };

    let mut codes = collect_color_codes(&dir)?;
    codes.extend(collect_color_codes(&dir.join(&options.colors_dir))?);

    let product = Product {
        code: folder.to_string(),
        colors: sort_codes(codes),
        metadata,
    };
    Ok((product, warning))
}

/// Build the manifest for the tree at `products_dir` without writing it.
///
/// A missing `products_dir` gives an empty manifest and a warning.
pub fn build_catalog(
    products_dir: &Path,
    options: &CatalogOptions,
) -> Result<CatalogReport, CatalogError> {
    if !products_dir.exists() {
        return Ok(CatalogReport {
            manifest: CatalogManifest::empty(&options.base_url),
            warnings: vec![format!(
                "Products directory {} does not exist",
                products_dir.display()
            )],
            output: None,
        });
    }

    let mut warnings = Vec::new();
    let mut all_codes = collect_color_codes(&products_dir.join(&options.colors_dir))?;
    let mut products = Vec::new();

    for folder in product_folders(products_dir, &options.colors_dir)? {
        let (product, warning) = scan_product(products_dir, &folder, options)?;
        warnings.extend(warning);
        all_codes.extend(product.colors.iter().cloned());
        products.push(product);
    }

    Ok(CatalogReport {
        manifest: CatalogManifest {
            base_url: options.base_url.clone(),
            colors: sort_codes(all_codes),
            products,
        },
        warnings,
        output: None,
    })
}

/// Serialize `manifest` as pretty JSON (two-space indent, no trailing
/// newline) to `path`, creating parent directories.
pub fn write_catalog(manifest: &CatalogManifest, path: &Path) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(path, json)?;
    Ok(())
}

/// Build the catalog for the project at `root` and write it where the
/// config says.
pub fn generate(config: &AssetConfig, root: &Path) -> Result<CatalogReport, CatalogError> {
    let options = CatalogOptions::from_config(config);
    let mut report = build_catalog(&config.products_dir(root), &options)?;
    let output = config.catalog_path(root);
    write_catalog(&report.manifest, &output)?;
    report.output = Some(output);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{touch, write_file};
    use tempfile::TempDir;

    fn build(root: &Path) -> CatalogReport {
        build_catalog(root, &CatalogOptions::default()).unwrap()
    }

    fn product<'a>(manifest: &'a CatalogManifest, code: &str) -> &'a Product {
        manifest
            .products
            .iter()
            .find(|p| p.code == code)
            .unwrap_or_else(|| panic!("product '{code}' not found"))
    }

    // =========================================================================
    // sort_codes
    // =========================================================================

    #[test]
    fn sort_codes_dedups_and_orders() {
        let sorted = sort_codes(["C100", "C010", "C100", "C011"].map(String::from));
        assert_eq!(sorted, vec!["C010", "C011", "C100"]);
    }

    #[test]
    fn sort_codes_is_case_insensitive_with_ordinal_ties() {
        let sorted = sort_codes(["b", "B", "a"].map(String::from));
        assert_eq!(sorted, vec!["a", "B", "b"]);
    }

    // =========================================================================
    // Color collection
    // =========================================================================

    #[test]
    fn collect_codes_recurses_and_filters() {
        let tmp = TempDir::new().unwrap();
        for name in [
            "C010.png",
            "nested/c011.webp",
            "C012-400.webp",
            "C01.png",
            "C013.gif",
            "readme.txt",
        ] {
            touch(&tmp.path().join(name));
        }

        let mut codes = collect_color_codes(tmp.path()).unwrap();
        codes.sort();
        assert_eq!(codes, vec!["C010", "C011"]);
    }

    #[test]
    fn collect_codes_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(collect_color_codes(&tmp.path().join("none")).unwrap().is_empty());
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    #[test]
    fn metadata_found_recursively_and_case_insensitively() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("fotos/INFO.JSON"), "{}");

        let found = find_metadata_file(tmp.path(), "info.json").unwrap();
        assert_eq!(found, Some(tmp.path().join("fotos/INFO.JSON")));
    }

    #[test]
    fn metadata_prefers_first_in_walk_order() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("b/info.json"), "{}");
        write_file(&tmp.path().join("a/info.json"), "{}");

        let found = find_metadata_file(tmp.path(), "info.json").unwrap();
        assert_eq!(found, Some(tmp.path().join("a/info.json")));
    }

    #[test]
    fn metadata_array_is_replaced_with_warning() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("info.json");
        write_file(&path, "[1, 2]");

        let (map, warning) = load_metadata(&path, tmp.path());
        assert!(map.is_empty());
        assert!(warning.unwrap().contains("not a JSON object"));
    }

    #[test]
    fn metadata_parse_error_is_a_warning() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("info.json");
        write_file(&path, "{ nope");

        let (map, warning) = load_metadata(&path, tmp.path());
        assert!(map.is_empty());
        assert!(warning.unwrap().starts_with("Failed to parse info.json"));
    }

    // =========================================================================
    // Whole catalog
    // =========================================================================

    #[test]
    fn missing_root_gives_empty_manifest() {
        let tmp = TempDir::new().unwrap();
        let report = build(&tmp.path().join("productos"));

        assert_eq!(report.manifest, CatalogManifest::empty("/assets/"));
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn colors_folder_is_never_a_product() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Colores/C010.png"));
        touch(&tmp.path().join("Mesa/C001.png"));

        let report = build(tmp.path());
        let codes: Vec<&str> = report.manifest.products.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["Mesa"]);
    }

    #[test]
    fn products_sorted_ordinally() {
        let tmp = TempDir::new().unwrap();
        for name in ["silla", "Mesa", "Banco"] {
            fs::create_dir_all(tmp.path().join(name)).unwrap();
        }
        touch(&tmp.path().join("loose-file.png"));

        let report = build(tmp.path());
        let codes: Vec<&str> = report.manifest.products.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["Banco", "Mesa", "silla"]);
    }

    #[test]
    fn product_colors_come_from_folder_and_its_colores() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Mesa/C002.png"));
        touch(&tmp.path().join("Mesa/colores/c001.webp"));
        touch(&tmp.path().join("Mesa/colores/C001.png"));
        touch(&tmp.path().join("Mesa/C002-400.webp"));

        let report = build(tmp.path());
        assert_eq!(product(&report.manifest, "Mesa").colors, vec!["C001", "C002"]);
    }

    #[test]
    fn global_colors_include_product_colors() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("colores/C010.png"));
        touch(&tmp.path().join("colores/C001.webp"));
        touch(&tmp.path().join("Mesa/C001.png"));
        touch(&tmp.path().join("Silla/colores/C020.svg"));

        let report = build(tmp.path());
        assert_eq!(report.manifest.colors, vec!["C001", "C010", "C020"]);
        // Shared swatches are not attributed to products
        assert_eq!(product(&report.manifest, "Mesa").colors, vec!["C001"]);
    }

    #[test]
    fn reserved_keys_override_metadata() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp.path().join("Mesa/info.json"),
            r#"{"codigo": "X", "nombre": "Mesa", "colores": ["Z"], "precio": 10}"#,
        );
        touch(&tmp.path().join("Mesa/C001.png"));

        let report = build(tmp.path());
        let json = serde_json::to_value(product(&report.manifest, "Mesa")).unwrap();

        assert_eq!(json["codigo"], "Mesa");
        assert_eq!(json["colores"], serde_json::json!(["C001"]));
        assert_eq!(json["nombre"], "Mesa");
        assert_eq!(json["precio"], 10);
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["codigo", "nombre", "colores", "precio"]);
    }

    #[test]
    fn bad_metadata_still_lists_product() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("Mesa/info.json"), "not json");

        let report = build(tmp.path());
        let mesa = product(&report.manifest, "Mesa");
        assert!(mesa.metadata.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Mesa"));
    }

    #[test]
    fn manifest_serializes_with_camel_case_and_fixed_order() {
        let manifest = CatalogManifest {
            base_url: "/assets/".into(),
            colors: vec!["C001".into()],
            products: vec![Product {
                code: "Mesa".into(),
                colors: vec!["C001".into()],
                metadata: Map::new(),
            }],
        };

        let json = serde_json::to_string_pretty(&manifest).unwrap();
        assert_eq!(
            json,
            r#"{
  "baseUrl": "/assets/",
  "colors": [
    "C001"
  ],
  "products": [
    {
      "codigo": "Mesa",
      "colores": [
        "C001"
      ]
    }
  ]
}"#
        );
    }

    #[test]
    fn generate_writes_catalog_and_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let config = AssetConfig::default();

        let report = generate(&config, tmp.path()).unwrap();

        let output = tmp.path().join("assets/catalogo.json");
        assert_eq!(report.output.as_deref(), Some(output.as_path()));
        let written = fs::read_to_string(&output).unwrap();
        assert!(!written.ends_with('\n'));
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"baseUrl": "/assets/", "colors": [], "products": []})
        );
    }

    #[test]
    fn metadata_numbers_are_written_as_parsed() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp.path().join("Mesa/info.json"),
            r#"{"precio": 120, "peso": 1.0, "ancho": 0.75}"#,
        );

        let report = build(tmp.path());
        let json = serde_json::to_string(product(&report.manifest, "Mesa")).unwrap();

        assert_eq!(
            json,
            r#"{"precio":120,"peso":1.0,"ancho":0.75,"codigo":"Mesa","colores":[]}"#
        );
    }

    #[test]
    fn assembly_error_keeps_previous_catalog() {
        let tmp = TempDir::new().unwrap();
        let catalog = tmp.path().join("assets/catalogo.json");
        write_file(&catalog, r#"{"previous": true}"#);
        // A file where the product directory should be makes listing fail
        write_file(&tmp.path().join("assets/productos"), "not a directory");

        let result = generate(&AssetConfig::default(), tmp.path());

        assert!(matches!(result, Err(CatalogError::Io(_))));
        assert_eq!(fs::read_to_string(&catalog).unwrap(), r#"{"previous": true}"#);
    }

    #[test]
    fn generate_is_deterministic() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("assets/productos/Mesa/C001.png"));
        touch(&tmp.path().join("assets/productos/colores/C010.png"));
        write_file(
            &tmp.path().join("assets/productos/Mesa/info.json"),
            r#"{"nombre":"Mesa"}"#,
        );
        let config = AssetConfig::default();

        generate(&config, tmp.path()).unwrap();
        let first = fs::read(tmp.path().join("assets/catalogo.json")).unwrap();
        generate(&config, tmp.path()).unwrap();
        let second = fs::read(tmp.path().join("assets/catalogo.json")).unwrap();

        assert_eq!(first, second);
    }
}
