//! Image processing.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resize → WebP/PNG** | Lanczos3 + libwebp / `PngEncoder` |
//! | **Convert** | decode + re-encode at original size |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: The idempotent unit of work wrapping a backend call

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{RenditionSize, WidthPlan, plan_widths, scaled_height};
pub use operations::{Outcome, ensure_conversion, ensure_output, ensure_rendition, is_present};
pub use params::{ConvertParams, Encoding, Quality, ResizeParams};
pub use rust_backend::RustBackend;
