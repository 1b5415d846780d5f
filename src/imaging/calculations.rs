//! Pure calculation functions for rendition dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// A single rendition width to generate, with its computed height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenditionSize {
    pub width: u32,
    pub height: u32,
}

/// Which configured widths apply to an original, and how many don't.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidthPlan {
    pub sizes: Vec<RenditionSize>,
    /// Widths dropped because the original is narrower than them.
    pub too_small: u32,
}

/// Height that keeps the original's aspect ratio at `target_width`.
///
/// Never returns 0, so a very wide, very short original still yields a
/// one-pixel-high rendition rather than an invalid image.
pub fn scaled_height(original: (u32, u32), target_width: u32) -> u32 {
    let (orig_w, orig_h) = original;
    if orig_w == 0 {
        return orig_h.max(1);
    }
    let h = (orig_h as f64 * target_width as f64 / orig_w as f64).round() as u32;
    h.max(1)
}

/// Decide which of `widths` to render for an original of `original` size.
///
/// Widths larger than the original width are never produced (no upscaling);
/// each one is counted in [`WidthPlan::too_small`]. A width equal to the
/// original width is produced. Order of `widths` is preserved.
///
/// ```text
/// original 500x250, widths [200, 400, 800] → 200x100, 400x200; too_small = 1
/// ```
pub fn plan_widths(original: (u32, u32), widths: &[u32]) -> WidthPlan {
    let (orig_w, _) = original;
    let mut plan = WidthPlan::default();

    for &width in widths {
        if orig_w < width {
            plan.too_small += 1;
            continue;
        }
        plan.sizes.push(RenditionSize {
            width,
            height: scaled_height(original, width),
        });
    }

    plan
}
