//! Image relay subsystem.
//!
//! # Data Flow
//! ```text
//! GET <path>?url=...
//!     → target.rs (read parameter, best-effort unescape, parse, scheme check)
//!     → policy.rs (optional host allow-list)
//!     → upstream.rs (GET with total timeout, tied to the request future)
//!     → handler.rs (status + Content-Type checks)
//!     → http/response.rs (CORS + cache headers, streamed body)
//! ```
//!
//! # Design Decisions
//! - Linear sequence of early exits; each exit writes one response
//! - Upstream body streamed chunk by chunk, never buffered whole
//! - No retries: transport failures surface as 502, upstream statuses pass through
//! - Client disconnect drops the handler future or body stream, which aborts the fetch

pub mod error;
pub mod handler;
pub mod policy;
pub mod target;
pub mod upstream;

use std::sync::Arc;

use axum::{routing::get, Router};

pub use error::RelayError;
pub use policy::HostPolicy;
pub use upstream::UpstreamClient;

/// Capabilities the relay handlers depend on.
#[derive(Clone)]
pub struct RelayState {
    pub upstream: UpstreamClient,
    pub policy: Arc<HostPolicy>,
}

impl RelayState {
    pub fn new(upstream: UpstreamClient, policy: HostPolicy) -> Self {
        Self {
            upstream,
            policy: Arc::new(policy),
        }
    }
}

/// Router serving the relay on `path`.
pub fn router(path: &str, state: RelayState) -> Router {
    Router::new()
        .route(path, get(handler::proxy_image).options(handler::preflight))
        .with_state(state)
}
