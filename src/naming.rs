//! Filename conventions shared by the image chores and the catalog.
//!
//! ## Color codes
//!
//! Color swatches are named after their code: `C010.png`, `c0042.webp`,
//! `C123.svg`. A code is the letter `C` followed by at least three digits.
//! Matching is case-insensitive and the extracted code is upper-cased, so
//! `c010.PNG` yields `C010`. Anything extra before the extension
//! (`C010-400.png`, `C010 copy.png`) is not a code.
//!
//! ## Renditions
//!
//! Renditions are written next to their original as `{base}-{width}.{ext}`:
//! `C001.png` → `C001-400.webp`. Any `png`/`webp` ending in `-<digits>` is
//! treated as a rendition and never as an original, which keeps repeated
//! runs from deriving renditions of renditions.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static COLOR_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^C\d{3,}\.(?:jpe?g|png|webp|avif|svg)$").expect("valid color file pattern")
});

static COLOR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^C\d{3,}$").expect("valid color code pattern"));

static RENDITION_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)-\d+\.(?:png|webp)$").expect("valid rendition pattern")
});

/// Output encodings produced by the image chores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    WebP,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Png => "png",
        }
    }

    /// Format of an input file, judged by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("webp") {
            Some(Self::WebP)
        } else if ext.eq_ignore_ascii_case("png") {
            Some(Self::Png)
        } else {
            None
        }
    }
}

/// Extract the color code from a swatch filename.
///
/// - `"C010.png"` → `Some("C010")`
/// - `"c0042.JPEG"` → `Some("C0042")`
/// - `"C01.png"` → `None` (fewer than three digits)
/// - `"C010-400.webp"` → `None` (rendition, not a swatch)
/// - `"C010.gif"` → `None` (not an accepted extension)
pub fn color_code(file_name: &str) -> Option<String> {
    if !COLOR_FILE.is_match(file_name) {
        return None;
    }
    let code = file_name.split('.').next()?.to_uppercase();
    COLOR_CODE.is_match(&code).then_some(code)
}

/// Whether a filename follows the `-<digits>.(png|webp)` rendition pattern.
pub fn is_rendition_name(file_name: &str) -> bool {
    RENDITION_FILE.is_match(file_name)
}

/// Path of the rendition of `original` at `width` in `format`.
///
/// Lives in the original's directory; the base name is the original's file
/// stem, so `dir/C001.PNG` at 400px as WEBP is `dir/C001-400.webp`.
pub fn rendition_path(original: &Path, width: u32, format: ImageFormat) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let name = format!("{}-{}.{}", stem, width, format.extension());
    match original.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Same-directory sibling of `path` with the extension swapped to `format`.
pub fn sibling_path(path: &Path, format: ImageFormat) -> PathBuf {
    path.with_extension(format.extension())
}
