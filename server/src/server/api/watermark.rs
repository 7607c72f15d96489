//! Watermark API:
//!   GET /api/watermark – fetch two images, overlay one onto the other, return JPEG
//!
//! Query: `mainImageUrl`, `markImageUrl`, `markRatio` (default 1),
//! `position` (default center).

use axum::Json;
use axum::body::Body;
use axum::extract::{RawQuery, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use serde_json::Value;
use watermark_engine::{Anchor, RenderOptions, Rendered, render_watermark};

use crate::app::SharedState;
use crate::services::image_fetch::FetchError;

use super::err_json;

const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=31536000";

#[derive(Debug, Default, Clone, PartialEq)]
pub struct WatermarkQuery {
    pub main_image_url: Option<String>,
    pub mark_image_url: Option<String>,
    pub mark_ratio: Option<String>,
    pub position: Option<String>,
}

impl WatermarkQuery {
    /// Parse a raw query string. The first occurrence of a key wins and
    /// unknown keys are ignored, so parsing never fails.
    pub fn from_query_string(raw: &str) -> Self {
        let mut query = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "mainImageUrl" => &mut query.main_image_url,
                "markImageUrl" => &mut query.mark_image_url,
                "markRatio" => &mut query.mark_ratio,
                "position" => &mut query.position,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq)]
struct WatermarkParams {
    main_image_url: String,
    mark_image_url: String,
    ratio: f64,
    anchor: Anchor,
}

#[derive(Debug, thiserror::Error)]
pub enum WatermarkApiError {
    #[error("mainImageUrl and markImageUrl are required")]
    MissingUrl,

    #[error("markRatio must be greater than 0")]
    InvalidRatio,

    #[error("Failed to fetch one or both images")]
    Fetch(#[source] FetchError),

    #[error("Failed to process image: {0}")]
    Processing(String),
}

impl WatermarkApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingUrl | Self::InvalidRatio | Self::Fetch(_) => StatusCode::BAD_REQUEST,
            Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn map_watermark_error(err: WatermarkApiError) -> (StatusCode, Json<Value>) {
    match &err {
        WatermarkApiError::Fetch(source) => tracing::warn!("Image fetch failed: {source}"),
        WatermarkApiError::Processing(_) => tracing::error!("Error processing image: {err}"),
        _ => tracing::debug!("Rejected watermark request: {err}"),
    }
    err_json(err.status(), &err.to_string())
}

/// GET /api/watermark
pub async fn get_watermark(
    State(state): State<SharedState>,
    RawQuery(raw): RawQuery,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let query = WatermarkQuery::from_query_string(raw.as_deref().unwrap_or_default());
    let rendered = run_watermark(&state, query)
        .await
        .map_err(map_watermark_error)?;

    Response::builder()
        .header(header::CONTENT_TYPE, "image/jpeg")
        .header(header::CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE)
        .body(Body::from(rendered.jpeg))
        .map_err(|e| map_watermark_error(WatermarkApiError::Processing(e.to_string())))
}

async fn run_watermark(
    state: &SharedState,
    query: WatermarkQuery,
) -> Result<Rendered, WatermarkApiError> {
    let params = parse_params(query)?;

    let (main, mark) = state
        .fetcher()
        .fetch_pair(&params.main_image_url, &params.mark_image_url)
        .await;
    let main_bytes = main.map_err(WatermarkApiError::Fetch)?;
    let mark_bytes = mark.map_err(WatermarkApiError::Fetch)?;

    let config = state.config();
    let options = RenderOptions {
        ratio: params.ratio,
        anchor: params.anchor,
        max_canvas_pixels: config.max_canvas_pixels,
        jpeg_quality: config.jpeg_quality,
    };

    tokio::task::spawn_blocking(move || render_watermark(&main_bytes, &mark_bytes, &options))
        .await
        .map_err(|e| WatermarkApiError::Processing(e.to_string()))?
        .map_err(|e| WatermarkApiError::Processing(e.to_string()))
}

fn parse_params(query: WatermarkQuery) -> Result<WatermarkParams, WatermarkApiError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let (Some(main_image_url), Some(mark_image_url)) = (
        non_empty(query.main_image_url),
        non_empty(query.mark_image_url),
    ) else {
        return Err(WatermarkApiError::MissingUrl);
    };

    let ratio = match non_empty(query.mark_ratio) {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| WatermarkApiError::InvalidRatio)?,
        None => 1.0,
    };
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(WatermarkApiError::InvalidRatio);
    }

    let anchor = query
        .position
        .as_deref()
        .map(Anchor::from_name)
        .unwrap_or_default();

    Ok(WatermarkParams {
        main_image_url: main_image_url.trim().to_string(),
        mark_image_url: mark_image_url.trim().to_string(),
        ratio,
        anchor,
    })
}
