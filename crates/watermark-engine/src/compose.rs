//! Image composition: crop the watermark to the canvas, flatten the canvas
//! and alpha-blend the watermark on.

use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use crate::placement::ImageDimensions;

/// Crop `mark` from its top-left corner so it is no larger than `canvas`.
///
/// Returns the image unchanged when it already fits.
pub fn crop_to_fit(mark: DynamicImage, canvas: ImageDimensions) -> DynamicImage {
    if mark.width() <= canvas.width && mark.height() <= canvas.height {
        return mark;
    }

    let width = mark.width().min(canvas.width);
    let height = mark.height().min(canvas.height);
    debug!(
        mark_w = mark.width(),
        mark_h = mark.height(),
        width,
        height,
        "Cropping watermark to canvas"
    );
    mark.crop_imm(0, 0, width, height)
}

/// Alpha-composite `mark` onto `base` with its top-left corner at `(x, y)`.
///
/// Pixels falling outside `base` are skipped.
pub fn composite(base: &mut RgbaImage, mark: &RgbaImage, x: u32, y: u32) {
    for (dx, dy, pixel) in mark.enumerate_pixels() {
        let (Some(target_x), Some(target_y)) = (x.checked_add(dx), y.checked_add(dy)) else {
            continue;
        };
        if target_x >= base.width() || target_y >= base.height() {
            continue;
        }

        let alpha = f32::from(pixel[3]) / 255.0;
        if alpha > 0.99 {
            base.put_pixel(target_x, target_y, *pixel);
        } else if alpha > 0.01 {
            let bg = base.get_pixel(target_x, target_y);
            let blended = blend_pixel(bg, pixel, alpha);
            base.put_pixel(target_x, target_y, blended);
        }
    }
}

/// Flatten transparency in `base` onto an opaque `background` colour.
pub fn flatten_onto(base: &mut RgbaImage, background: Rgba<u8>) {
    let background = Rgba([background[0], background[1], background[2], 255]);
    for pixel in base.pixels_mut() {
        if pixel[3] < 255 {
            *pixel = blend_pixel(&background, pixel, f32::from(pixel[3]) / 255.0);
        }
    }
}

/// Porter-Duff "over": `fg` with coverage `alpha` drawn on top of `bg`.
fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let bg_alpha = f32::from(bg[3]) / 255.0;
    let bg_weight = bg_alpha * (1.0 - alpha);
    let out_alpha = alpha + bg_weight;
    if out_alpha <= f32::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        ((f32::from(fg[i]) * alpha + f32::from(bg[i]) * bg_weight) / out_alpha)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_alpha * 255.0).round() as u8,
    ])
}
