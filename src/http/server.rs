//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Construct the shared upstream client and host policy
//! - Serve on a listener until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RelayConfig;
use crate::http::health::{get_health, HEALTH_PATH};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::recv_shutdown;
use crate::relay::{self, HostPolicy, RelayState, UpstreamClient};
use crate::storage::BackingServices;

/// Application state injected into non-relay handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Option<Arc<BackingServices>>,
}

/// HTTP server for the image relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// `services` is `None` when backing services are disabled.
    pub fn new(
        config: RelayConfig,
        services: Option<BackingServices>,
    ) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::new(&config.relay)?;
        let policy = HostPolicy::new(&config.relay.allowed_hosts);

        if !policy.is_open() {
            tracing::info!(hosts = ?config.relay.allowed_hosts, "Upstream host allow-list active");
        }

        let relay_state = RelayState::new(upstream, policy);
        let state = AppState {
            services: services.map(Arc::new),
        };

        let router = Self::build_router(&config, state, relay_state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState, relay_state: RelayState) -> Router {
        Router::new()
            .route(HEALTH_PATH, get(get_health))
            .with_state(state)
            .merge(relay::router(&config.relay.path, relay_state))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight requests are drained first.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            relay_path = %self.config.relay.path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(recv_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
