//! End-to-end render: decode both images, place, resize, composite, encode.

use image::{DynamicImage, Rgba};
use tracing::info;

use crate::placement::{
    Anchor, PlacementRequest, PlacementResult, check_canvas_budget, compute_placement,
};
use crate::{DEFAULT_JPEG_QUALITY, EngineError, codec, compose, resize};

/// Colour behind transparent regions of the main image.
const JPEG_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Parameters of a single render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub ratio: f64,
    pub anchor: Anchor,
    /// Upper bound on the final canvas area.
    pub max_canvas_pixels: u64,
    pub jpeg_quality: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ratio: 1.0,
            anchor: Anchor::Center,
            max_canvas_pixels: 100_000_000,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Encoded composite plus the placement that produced it.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub jpeg: Vec<u8>,
    pub placement: PlacementResult,
}

/// Overlay the watermark in `mark_bytes` onto the image in `main_bytes`.
///
/// CPU bound; async callers should run this on a blocking thread.
pub fn render_watermark(
    main_bytes: &[u8],
    mark_bytes: &[u8],
    options: &RenderOptions,
) -> Result<Rendered, EngineError> {
    let main = codec::decode(main_bytes)?;
    let mark = codec::decode(mark_bytes)?;

    let placement = compute_placement(&PlacementRequest {
        main: codec::dimensions_of(&main),
        mark: codec::dimensions_of(&mark),
        ratio: options.ratio,
        anchor: options.anchor,
    })?;
    check_canvas_budget(placement.final_main, options.max_canvas_pixels)?;

    let canvas = resize::resize_exact(main, placement.final_main);
    let mark = resize::resize_exact(mark, placement.final_mark);
    let mark = compose::crop_to_fit(mark, placement.final_main);

    // JPEG has no alpha channel
    let mut canvas = canvas.into_rgba8();
    compose::flatten_onto(&mut canvas, JPEG_BACKGROUND);
    compose::composite(
        &mut canvas,
        &mark.into_rgba8(),
        placement.offset_x,
        placement.offset_y,
    );

    let jpeg = codec::encode_jpeg(&DynamicImage::ImageRgba8(canvas), options.jpeg_quality)?;

    info!(
        canvas = %placement.final_main,
        mark = %placement.final_mark,
        offset_x = placement.offset_x,
        offset_y = placement.offset_y,
        bytes = jpeg.len(),
        "Rendered watermarked image"
    );

    Ok(Rendered { jpeg, placement })
}
