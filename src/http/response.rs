//! Response construction.
//!
//! # Responsibilities
//! - Render errors as `{"error": ...}` JSON
//! - Attach CORS and cache headers to relayed images
//! - Wrap upstream bodies for streaming
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Content-Length is left to the server; upstream hints are not copied

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// One year, public.
pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000";

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";

/// Add permissive cross-origin headers.
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
}

/// 200 response carrying a relayed image.
pub fn image_response(content_type: HeaderValue, body: Body) -> Response {
    let mut response = Response::new(body);
    let headers = response.headers_mut();
    apply_cors(headers);
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(IMAGE_CACHE_CONTROL));
    headers.insert(header::CONTENT_TYPE, content_type);
    response
}

/// 204 response to a CORS preflight.
pub fn preflight_response() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    apply_cors(response.headers_mut());
    response
}

/// JSON error body with the given status.
pub fn json_error(status: StatusCode, body: serde_json::Value) -> Response {
    (status, Json(body)).into_response()
}
