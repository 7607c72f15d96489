//! Exact-size resizing for the canvas and the watermark.
//!
//! Uses Lanczos3 filtering. Aspect ratio is not preserved: the placement
//! step decides both axes independently.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

use crate::placement::ImageDimensions;

/// Resize an image to exactly `target`.
///
/// Returns the image unchanged if it already has the target size.
pub fn resize_exact(img: DynamicImage, target: ImageDimensions) -> DynamicImage {
    let (orig_w, orig_h) = (img.width(), img.height());

    if orig_w == target.width && orig_h == target.height {
        debug!(
            width = orig_w,
            height = orig_h,
            "Image already at target size, skipping resize"
        );
        return img;
    }

    debug!(
        orig_w,
        orig_h,
        new_width = target.width,
        new_height = target.height,
        "Resizing image to target size"
    );

    img.resize_exact(target.width, target.height, FilterType::Lanczos3)
}
