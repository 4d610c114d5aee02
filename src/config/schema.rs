//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the image relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Deployment environment; `production` switches logs to JSON.
    pub environment: Environment,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Image relay endpoint settings.
    pub relay: RelaySettings,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Document database and object storage clients.
    pub storage: StorageConfig,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Image relay settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelaySettings {
    /// Route the relay is mounted on.
    pub path: String,

    /// Total timeout for one upstream fetch, body included, in seconds.
    pub upstream_timeout_secs: u64,

    /// User-Agent sent to upstream servers.
    pub user_agent: String,

    /// Hosts the relay may fetch from. Empty means any host.
    pub allowed_hosts: Vec<String>,

    /// Maximum redirects followed per fetch.
    pub max_redirects: usize,

    /// Route fetches through proxies named by `HTTP_PROXY`/`HTTPS_PROXY`.
    pub use_system_proxy: bool,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            path: "/api/proxy/image".to_string(),
            upstream_timeout_secs: 30,
            user_agent: concat!("image-relay/", env!("CARGO_PKG_VERSION")).to_string(),
            allowed_hosts: Vec::new(),
            max_redirects: 10,
            use_system_proxy: true,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Ceiling on the time to produce response headers, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Backing service configuration (DynamoDB documents, S3 objects).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Connect to backing services at startup.
    pub enabled: bool,

    /// AWS region.
    pub region: String,

    /// Endpoint override for local emulators (e.g., "http://localhost:4566").
    pub endpoint_url: Option<String>,

    /// Object storage bucket.
    pub bucket: String,

    /// Document table.
    pub table: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            region: "us-east-1".to_string(),
            endpoint_url: None,
            bucket: String::new(),
            table: String::new(),
        }
    }
}
