//! Watermark composition engine.
//!
//! Decides how large a watermark is drawn and where it lands on the main
//! image, then performs the decode, resize, composite and JPEG encode steps.

pub mod codec;
pub mod compose;
pub mod placement;
pub mod render;
pub mod resize;

// Re-exports for convenience
pub use codec::{decode, dimensions_of, encode_jpeg};
pub use compose::{composite, crop_to_fit, flatten_onto};
pub use placement::{
    Anchor, ImageDimensions, MAX_CANVAS_SIDE, PlacementRequest, PlacementResult,
    check_canvas_budget, compute_placement,
};
pub use render::{RenderOptions, Rendered, render_watermark};
pub use resize::resize_exact;

/// Default JPEG quality used when callers have no preference.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Unified error type for the watermark-engine crate.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Canvas {width}x{height} exceeds the limit of {limit} pixels")]
    CanvasTooLarge { width: u32, height: u32, limit: u64 },

    #[error("Canvas {width}x{height} exceeds the maximum side length of {max} pixels")]
    CanvasSideTooLarge { width: u32, height: u32, max: u32 },

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}
