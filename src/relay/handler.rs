//! Axum handlers for the relay endpoint.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{RawQuery, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;

use crate::http::response::{image_response, preflight_response};
use crate::observability::metrics;
use crate::relay::error::RelayError;
use crate::relay::target::{parse_target, url_param};
use crate::relay::RelayState;

/// `GET <relay path>?url=...`
///
/// Every exit writes exactly one response. Error paths drop the upstream
/// response before returning, which releases its connection.
pub async fn proxy_image(
    State(state): State<RelayState>,
    RawQuery(query): RawQuery,
) -> Response {
    let start = Instant::now();

    match relay_image(&state, query.as_deref()).await {
        Ok(response) => {
            metrics::record_relay("relayed", response.status(), start);
            response
        }
        Err(err) => {
            err.log();
            metrics::record_relay(err.outcome(), err.status(), start);
            err.into_response()
        }
    }
}

/// `OPTIONS <relay path>`
pub async fn preflight() -> impl IntoResponse {
    preflight_response()
}

async fn relay_image(state: &RelayState, query: Option<&str>) -> Result<Response, RelayError> {
    // 1. Validate target
    let raw = url_param(query).ok_or(RelayError::MissingUrl)?;
    let target = parse_target(&raw)?;
    state.policy.check(&target)?;

    tracing::debug!(url = %target, "Fetching upstream image");

    // 2. Fetch
    let upstream = state.upstream.fetch(&target).await.map_err(RelayError::Fetch)?;

    // 3. Validate upstream response
    // Only a full 200 is relayed; 204/206 bodies must not be cached as the image.
    let status = upstream.status();
    if status != StatusCode::OK {
        return Err(RelayError::UpstreamStatus(status));
    }

    let content_type = match upstream.headers().get(header::CONTENT_TYPE) {
        Some(value) if is_image(value) => value.clone(),
        other => {
            let seen = other
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            return Err(RelayError::NotAnImage(seen));
        }
    };

    // Length hint is informational; the body is streamed and the server frames it.
    tracing::debug!(
        url = %target,
        content_type = ?content_type,
        content_length = ?upstream.content_length(),
        "Streaming upstream image"
    );

    // 4. Stream
    let body = upstream.bytes_stream().inspect_err(|e| {
        tracing::warn!(error = %e, "Upstream body stream aborted");
    });

    Ok(image_response(content_type, Body::from_stream(body)))
}

fn is_image(content_type: &HeaderValue) -> bool {
    content_type
        .to_str()
        .map(|ct| ct.starts_with("image/"))
        .unwrap_or(false)
}
