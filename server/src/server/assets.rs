//! Static file serving for the watermark form page (web/).

use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;
use serde_json::json;

#[derive(Embed)]
#[folder = "web/"]
struct WebAssets;

/// Serve the form page for bare `/` requests.
pub async fn index() -> Response {
    serve_embedded::<WebAssets>("index.html")
}

/// Fallback handler: serve embedded assets for unmatched paths.
/// Unknown API paths get a JSON 404 instead of the page.
pub async fn fallback(uri: Uri) -> Response {
    let request_path = uri.path();
    if should_return_non_spa_not_found(request_path) {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(json!({
                "error": "Not Found",
                "path": request_path,
            })),
        )
            .into_response();
    }

    serve_embedded::<WebAssets>(request_path.trim_start_matches('/'))
}

fn should_return_non_spa_not_found(path: &str) -> bool {
    const NON_SPA_PREFIXES: [&str; 2] = ["/api", "/status"];

    NON_SPA_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

fn serve_embedded<E: Embed>(path: &str) -> Response {
    let (path, asset) = match E::get(path) {
        Some(asset) => (path, Some(asset)),
        None => ("index.html", E::get("index.html")),
    };

    match asset {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.to_vec(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
