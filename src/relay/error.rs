//! Relay failure outcomes and their HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::http::response::json_error;

/// Every way a relay request can end without streaming an image.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("url parameter is required")]
    MissingUrl,

    #[error("invalid URL")]
    InvalidUrl,

    #[error("URL not allowed")]
    HostNotAllowed(String),

    #[error("failed to fetch image")]
    Fetch(#[source] reqwest::Error),

    #[error("upstream returned error")]
    UpstreamStatus(StatusCode),

    #[error("URL does not point to an image")]
    NotAnImage(String),
}

impl RelayError {
    /// Status code written to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingUrl | RelayError::InvalidUrl | RelayError::NotAnImage(_) => {
                StatusCode::BAD_REQUEST
            }
            RelayError::HostNotAllowed(_) => StatusCode::FORBIDDEN,
            RelayError::Fetch(_) => StatusCode::BAD_GATEWAY,
            RelayError::UpstreamStatus(status) => *status,
        }
    }

    /// Metric label for this outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::MissingUrl => "missing_url",
            RelayError::InvalidUrl => "invalid_url",
            RelayError::HostNotAllowed(_) => "host_not_allowed",
            RelayError::Fetch(_) => "fetch_failed",
            RelayError::UpstreamStatus(_) => "upstream_error",
            RelayError::NotAnImage(_) => "not_an_image",
        }
    }

    /// Emit a log event at a level matching who is at fault.
    pub fn log(&self) {
        match self {
            RelayError::Fetch(e) => {
                tracing::warn!(error = %e, timeout = e.is_timeout(), "Upstream fetch failed");
            }
            RelayError::UpstreamStatus(status) => {
                tracing::info!(status = %status, "Upstream returned error status");
            }
            RelayError::NotAnImage(content_type) => {
                tracing::info!(content_type = %content_type, "Upstream content is not an image");
            }
            RelayError::HostNotAllowed(host) => {
                tracing::info!(host = %host, "Target host not in allow-list");
            }
            RelayError::MissingUrl | RelayError::InvalidUrl => {
                tracing::debug!(reason = %self, "Rejected relay request");
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            RelayError::UpstreamStatus(upstream) => json!({
                "error": self.to_string(),
                "status": upstream.as_u16(),
            }),
            _ => json!({ "error": self.to_string() }),
        };
        json_error(status, body)
    }
}
