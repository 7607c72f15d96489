//! Placement arithmetic: final canvas size, watermark size and draw offset.
//!
//! The ratio relates the watermark to the main image's natural size:
//! - `ratio == 1` stretches the watermark over the whole canvas,
//! - `ratio < 1` grows the canvas to `natural / ratio` and keeps the
//!   watermark at the main image's natural size,
//! - `ratio > 1` keeps the canvas and shrinks the watermark to `natural / ratio`.
//!
//! Offsets are always clamped so the watermark stays fully inside the canvas.

use tracing::debug;

use crate::EngineError;

/// Pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    fn ensure_non_empty(&self, label: &str) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidArgument(format!(
                "{label} dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Divide both axes by `ratio`, rounding half away from zero.
    fn divided_by(&self, ratio: f64) -> Self {
        Self {
            width: round_px(f64::from(self.width) / ratio),
            height: round_px(f64::from(self.height) / ratio),
        }
    }
}

impl std::fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Named position of the watermark on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// Parse an anchor name. Unknown names fall back to [`Anchor::Center`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "top-left" => Self::TopLeft,
            "top-right" => Self::TopRight,
            "bottom-left" => Self::BottomLeft,
            "bottom-right" => Self::BottomRight,
            _ => Self::Center,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl From<&str> for Anchor {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// Input of [`compute_placement`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    pub main: ImageDimensions,
    pub mark: ImageDimensions,
    pub ratio: f64,
    pub anchor: Anchor,
}

/// Output of [`compute_placement`].
///
/// `offset_x + final_mark.width <= final_main.width` (same for Y).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementResult {
    pub final_main: ImageDimensions,
    pub final_mark: ImageDimensions,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Compute final image sizes and the watermark draw offset.
///
/// Fails with [`EngineError::InvalidArgument`] when the ratio is not a
/// positive finite number or when either image has a zero dimension.
pub fn compute_placement(req: &PlacementRequest) -> Result<PlacementResult, EngineError> {
    if !req.ratio.is_finite() || req.ratio <= 0.0 {
        return Err(EngineError::InvalidArgument(format!(
            "ratio must be greater than 0, got {}",
            req.ratio
        )));
    }
    req.main.ensure_non_empty("main image")?;
    req.mark.ensure_non_empty("watermark")?;

    let (final_main, final_mark) = if req.ratio == 1.0 {
        (req.main, req.main)
    } else if req.ratio < 1.0 {
        (req.main.divided_by(req.ratio), req.main)
    } else {
        (req.main, req.main.divided_by(req.ratio))
    };

    let (offset_x, offset_y) = anchor_offset(req.anchor, final_main, final_mark);

    debug!(
        ratio = req.ratio,
        anchor = req.anchor.as_str(),
        main = %req.main,
        mark = %req.mark,
        final_main = %final_main,
        final_mark = %final_mark,
        offset_x,
        offset_y,
        "Computed watermark placement"
    );

    Ok(PlacementResult {
        final_main,
        final_mark,
        offset_x,
        offset_y,
    })
}

/// Longest canvas side the JPEG encoder can write.
pub const MAX_CANVAS_SIDE: u32 = u16::MAX as u32;

/// Reject canvases the encoder cannot write or whose pixel count exceeds `limit`.
pub fn check_canvas_budget(canvas: ImageDimensions, limit: u64) -> Result<(), EngineError> {
    if canvas.width > MAX_CANVAS_SIDE || canvas.height > MAX_CANVAS_SIDE {
        return Err(EngineError::CanvasSideTooLarge {
            width: canvas.width,
            height: canvas.height,
            max: MAX_CANVAS_SIDE,
        });
    }
    if canvas.pixel_count() > limit {
        return Err(EngineError::CanvasTooLarge {
            width: canvas.width,
            height: canvas.height,
            limit,
        });
    }
    Ok(())
}

fn anchor_offset(anchor: Anchor, canvas: ImageDimensions, mark: ImageDimensions) -> (u32, u32) {
    let max_x = i64::from(canvas.width) - i64::from(mark.width);
    let max_y = i64::from(canvas.height) - i64::from(mark.height);

    let (x, y) = match anchor {
        Anchor::TopLeft => (0, 0),
        Anchor::TopRight => (max_x, 0),
        Anchor::BottomLeft => (0, max_y),
        Anchor::BottomRight => (max_x, max_y),
        Anchor::Center => (half_rounded(max_x), half_rounded(max_y)),
    };

    (clamp_offset(x, max_x), clamp_offset(y, max_y))
}

fn half_rounded(span: i64) -> i64 {
    (span as f64 / 2.0).round() as i64
}

/// Clamp into `0..=max`; a negative `max` collapses to 0.
fn clamp_offset(value: i64, max: i64) -> u32 {
    // max never exceeds u32::MAX since it is a difference of two u32 values
    value.min(max).max(0) as u32
}

/// Round to whole pixels, never below 1.
fn round_px(value: f64) -> u32 {
    (value.round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHORS: [Anchor; 5] = [
        Anchor::Center,
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
    ];

    fn dims(width: u32, height: u32) -> ImageDimensions {
        ImageDimensions::new(width, height)
    }

    fn place(main: ImageDimensions, ratio: f64, anchor: Anchor) -> PlacementResult {
        compute_placement(&PlacementRequest {
            main,
            mark: dims(50, 50),
            ratio,
            anchor,
        })
        .unwrap()
    }

    fn assert_fits(result: &PlacementResult) {
        assert!(
            result.offset_x + result.final_mark.width <= result.final_main.width,
            "watermark overflows horizontally: {result:?}"
        );
        assert!(
            result.offset_y + result.final_mark.height <= result.final_main.height,
            "watermark overflows vertically: {result:?}"
        );
    }

    #[test]
    fn anchor_names_parse() {
        assert_eq!(Anchor::from_name("center"), Anchor::Center);
        assert_eq!(Anchor::from_name("top-left"), Anchor::TopLeft);
        assert_eq!(Anchor::from_name("top-right"), Anchor::TopRight);
        assert_eq!(Anchor::from_name("bottom-left"), Anchor::BottomLeft);
        assert_eq!(Anchor::from_name("bottom-right"), Anchor::BottomRight);
        for anchor in ANCHORS {
            assert_eq!(Anchor::from(anchor.as_str()), anchor);
        }
    }

    #[test]
    fn unknown_anchor_falls_back_to_center() {
        assert_eq!(Anchor::from_name("middle"), Anchor::Center);
        assert_eq!(Anchor::from_name(""), Anchor::Center);
        assert_eq!(Anchor::from_name("TOP-LEFT"), Anchor::Center);

        let main = dims(801, 599);
        for ratio in [0.3, 1.0, 2.5] {
            assert_eq!(
                place(main, ratio, Anchor::from_name("nowhere")),
                place(main, ratio, Anchor::Center)
            );
        }
    }

    #[test]
    fn ratio_two_bottom_right() {
        let result = place(dims(800, 600), 2.0, Anchor::BottomRight);
        assert_eq!(result.final_main, dims(800, 600));
        assert_eq!(result.final_mark, dims(400, 300));
        assert_eq!((result.offset_x, result.offset_y), (400, 300));
    }

    #[test]
    fn ratio_half_center() {
        let result = place(dims(800, 600), 0.5, Anchor::Center);
        assert_eq!(result.final_main, dims(1600, 1200));
        assert_eq!(result.final_mark, dims(800, 600));
        assert_eq!((result.offset_x, result.offset_y), (400, 300));
    }

    #[test]
    fn ratio_one_covers_canvas_for_every_anchor() {
        for anchor in ANCHORS {
            let result = place(dims(640, 480), 1.0, anchor);
            assert_eq!(result.final_main, dims(640, 480));
            assert_eq!(result.final_mark, dims(640, 480));
            assert_eq!((result.offset_x, result.offset_y), (0, 0), "{anchor:?}");
        }
    }

    #[test]
    fn ratio_one_ignores_watermark_natural_size() {
        let result = compute_placement(&PlacementRequest {
            main: dims(300, 200),
            mark: dims(1000, 20),
            ratio: 1.0,
            anchor: Anchor::Center,
        })
        .unwrap();
        assert_eq!(result.final_mark, dims(300, 200));
    }

    #[test]
    fn ratio_below_one_grows_canvas_for_every_anchor() {
        let main = dims(800, 600);
        let expected = [
            (Anchor::Center, (400, 300)),
            (Anchor::TopLeft, (0, 0)),
            (Anchor::TopRight, (800, 0)),
            (Anchor::BottomLeft, (0, 600)),
            (Anchor::BottomRight, (800, 600)),
        ];
        for (anchor, offset) in expected {
            let result = place(main, 0.5, anchor);
            assert_eq!(result.final_main, dims(1600, 1200));
            assert_eq!(result.final_mark, main);
            assert_eq!((result.offset_x, result.offset_y), offset, "{anchor:?}");
        }
    }

    #[test]
    fn ratio_above_one_shrinks_mark_for_every_anchor() {
        let main = dims(800, 600);
        let expected = [
            (Anchor::Center, (300, 225)),
            (Anchor::TopLeft, (0, 0)),
            (Anchor::TopRight, (600, 0)),
            (Anchor::BottomLeft, (0, 450)),
            (Anchor::BottomRight, (600, 450)),
        ];
        for (anchor, offset) in expected {
            let result = place(main, 4.0, anchor);
            assert_eq!(result.final_main, main);
            assert_eq!(result.final_mark, dims(200, 150));
            assert_eq!((result.offset_x, result.offset_y), offset, "{anchor:?}");
        }
    }

    #[test]
    fn scaled_sizes_round_half_away_from_zero() {
        // 101 / 2 = 50.5 -> 51, 75 / 2 = 37.5 -> 38
        let result = place(dims(101, 75), 2.0, Anchor::TopLeft);
        assert_eq!(result.final_mark, dims(51, 38));

        // 101 / 0.4 = 252.5 -> 253, 75 / 0.4 = 187.5 -> 188
        let result = place(dims(101, 75), 0.4, Anchor::TopLeft);
        assert_eq!(result.final_main, dims(253, 188));
    }

    #[test]
    fn center_offset_rounds_half_away_from_zero() {
        // canvas 101x75, mark 51x38: (50 / 2, 37 / 2) = (25, 18.5 -> 19)
        let result = place(dims(101, 75), 2.0, Anchor::Center);
        assert_eq!((result.offset_x, result.offset_y), (25, 19));
    }

    #[test]
    fn center_is_symmetric_for_square_images() {
        for ratio in [0.25, 0.7, 1.0, 1.5, 3.0] {
            let result = place(dims(500, 500), ratio, Anchor::Center);
            assert_eq!(result.offset_x, result.offset_y, "ratio {ratio}");
        }
    }

    #[test]
    fn tiny_images_never_produce_zero_sized_marks() {
        let result = place(dims(1, 1), 10.0, Anchor::BottomRight);
        assert_eq!(result.final_mark, dims(1, 1));
        assert_eq!((result.offset_x, result.offset_y), (0, 0));
    }

    #[test]
    fn offsets_always_fit_inside_canvas() {
        let mains = [dims(1, 1), dims(3, 7), dims(800, 600), dims(1921, 1079)];
        let ratios = [0.1, 0.33, 0.5, 0.999, 1.0, 1.001, 1.5, 2.0, 7.3, 100.0];
        for main in mains {
            for ratio in ratios {
                for anchor in ANCHORS {
                    assert_fits(&place(main, ratio, anchor));
                }
            }
        }
    }

    #[test]
    fn clamp_handles_mark_larger_than_canvas() {
        let canvas = dims(100, 100);
        let mark = dims(150, 120);
        for anchor in ANCHORS {
            assert_eq!(anchor_offset(anchor, canvas, mark), (0, 0), "{anchor:?}");
        }
    }

    #[test]
    fn rejects_non_positive_ratio() {
        for ratio in [0.0, -1.0, -0.5, f64::NAN, f64::INFINITY] {
            let err = compute_placement(&PlacementRequest {
                main: dims(10, 10),
                mark: dims(10, 10),
                ratio,
                anchor: Anchor::Center,
            })
            .unwrap_err();
            assert!(matches!(err, EngineError::InvalidArgument(_)), "ratio {ratio}");
        }
    }

    #[test]
    fn rejects_zero_dimensions() {
        let cases = [
            (dims(0, 10), dims(10, 10)),
            (dims(10, 0), dims(10, 10)),
            (dims(10, 10), dims(0, 10)),
            (dims(10, 10), dims(10, 0)),
        ];
        for (main, mark) in cases {
            let err = compute_placement(&PlacementRequest {
                main,
                mark,
                ratio: 1.0,
                anchor: Anchor::Center,
            })
            .unwrap_err();
            assert!(matches!(err, EngineError::InvalidArgument(_)));
        }
    }

    #[test]
    fn canvas_budget_rejects_oversized_canvas() {
        assert!(check_canvas_budget(dims(100, 100), 10_000).is_ok());
        let err = check_canvas_budget(dims(100, 101), 10_000).unwrap_err();
        assert!(matches!(
            err,
            EngineError::CanvasTooLarge {
                width: 100,
                height: 101,
                limit: 10_000
            }
        ));
    }

    #[test]
    fn canvas_budget_rejects_sides_the_encoder_cannot_write() {
        assert!(check_canvas_budget(dims(65_535, 1), u64::MAX).is_ok());
        assert!(check_canvas_budget(dims(1, 65_535), u64::MAX).is_ok());

        let err = check_canvas_budget(dims(65_536, 1), u64::MAX).unwrap_err();
        assert!(matches!(
            err,
            EngineError::CanvasSideTooLarge {
                width: 65_536,
                height: 1,
                max: 65_535
            }
        ));
        assert!(matches!(
            check_canvas_budget(dims(10, 70_000), u64::MAX),
            Err(EngineError::CanvasSideTooLarge { .. })
        ));
    }
}
