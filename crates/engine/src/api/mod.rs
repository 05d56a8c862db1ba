//! API layer - HTTP and WebSocket entry points.

pub mod http;
pub mod websocket;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app::App;

/// Every HTTP and WebSocket route, traced.
pub fn router(app: Arc<App>, cors: Option<CorsLayer>) -> Router {
    let router = http::routes()
        .route("/ws/locations/{location_id}", get(websocket::ws_handler))
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// CORS for `allowed_origins`: `*` or a comma-separated list.
///
/// Returns `None` when nothing usable is configured.
pub fn cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins.map(str::trim).filter(|s| !s.is_empty())?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        return Some(cors.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    if origins.is_empty() {
        return None;
    }
    Some(cors.allow_origin(origins))
}
