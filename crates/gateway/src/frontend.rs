//! Static assets compiled into the binary.
//!
//! Pages are rendered in [`crate::pages`]; only the stylesheet and the
//! page script are served from here, out of `frontend/` via `include_str!`.

use axum::{
    Router,
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

const STYLE_CSS: &str = include_str!("../../../frontend/style.css");
const APP_JS: &str = include_str!("../../../frontend/app.js");

/// Content type and body of an embedded asset.
fn asset(name: &str) -> Option<(&'static str, &'static str)> {
    match name {
        "style.css" => Some(("text/css; charset=utf-8", STYLE_CSS)),
        "app.js" => Some(("application/javascript; charset=utf-8", APP_JS)),
        _ => None,
    }
}

pub fn frontend_router() -> Router {
    Router::new().route("/static/{file}", get(asset_handler))
}

async fn asset_handler(Path(file): Path<String>) -> Response {
    match asset(&file) {
        Some((content_type, body)) => (
            [
                (header::CONTENT_TYPE, content_type),
                (header::CACHE_CONTROL, "public, max-age=3600"),
            ],
            body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
