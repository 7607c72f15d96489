//! REST API handlers.

pub mod watermark;

use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};

/// Standard error response: `{"error": message}`.
pub fn err_json(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}
