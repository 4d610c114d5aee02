//! Image relay server.
//!
//! Fetches remote images server-side and streams them back with
//! permissive CORS headers and long-lived cache directives.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 IMAGE RELAY                  │
//!                      │                                              │
//!   GET ?url=...       │  ┌─────────┐   ┌─────────┐   ┌──────────┐   │
//!   ───────────────────┼─▶│  http   │──▶│  relay  │──▶│ upstream │───┼──▶ Image host
//!                      │  │ server  │   │ target/ │   │  client  │   │
//!   image bytes        │  │         │   │ policy  │   │ (pooled) │   │
//!   ◀──────────────────┼──│response │◀──│ handler │◀──│          │◀──┼───
//!                      │  └─────────┘   └─────────┘   └──────────┘   │
//!                      │                                              │
//!                      │  config · lifecycle · observability · storage│
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use image_relay::config::{load_config, validate_config, ConfigError, RelayConfig};
use image_relay::observability::{init_logging, metrics};
use image_relay::{BackingServices, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "image-relay")]
#[command(about = "Server-side image fetching relay", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

impl Cli {
    fn load(&self) -> Result<RelayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RelayConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
            validate_config(&config).map_err(ConfigError::Validation)?;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.load()?;

    init_logging(&config.observability, config.environment.is_production());

    tracing::info!("image-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        bind_address = %config.listener.bind_address,
        relay_path = %config.relay.path,
        upstream_timeout_secs = config.relay.upstream_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address was checked during validation.
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let services = if config.storage.enabled {
        match BackingServices::connect(&config.storage).await {
            Ok(services) => Some(services),
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize backing services");
                return Err(e.into());
            }
        }
    } else {
        tracing::info!("Backing services disabled");
        None
    };

    let server = HttpServer::new(config.clone(), services)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
