//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that enabled subsystems carry the settings they need
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::http::health::HEALTH_PATH;

/// Routes the server mounts itself; the relay may not shadow them.
pub const RESERVED_PATHS: &[&str] = &[HEALTH_PATH];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("relay.path: must start with '/' (got '{0}')")]
    InvalidPath(String),

    #[error("relay.path: '{0}' is reserved")]
    ReservedPath(String),

    #[error("relay.path: '{0}' must be a literal path (no '{{', '}}' or '*')")]
    PatternPath(String),

    #[error("relay.user_agent: must not be empty")]
    EmptyUserAgent,

    #[error("relay.allowed_hosts: empty host entry")]
    EmptyHost,

    #[error("storage.{0}: required when storage is enabled")]
    MissingStorageField(&'static str),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let relay = &config.relay;
    if !relay.path.starts_with('/') {
        errors.push(ValidationError::InvalidPath(relay.path.clone()));
    }
    if RESERVED_PATHS.contains(&relay.path.as_str()) {
        errors.push(ValidationError::ReservedPath(relay.path.clone()));
    }
    // Router syntax would turn these into captures, or panic on malformed ones.
    if relay.path.contains(|c| matches!(c, '{' | '}' | '*')) {
        errors.push(ValidationError::PatternPath(relay.path.clone()));
    }
    if relay.upstream_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "relay.upstream_timeout_secs" });
    }
    if relay.user_agent.trim().is_empty() {
        errors.push(ValidationError::EmptyUserAgent);
    }
    if relay.allowed_hosts.iter().any(|h| h.trim().is_empty()) {
        errors.push(ValidationError::EmptyHost);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.request_secs" });
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: obs.metrics_address.clone(),
        });
    }

    let storage = &config.storage;
    if storage.enabled {
        if storage.bucket.is_empty() {
            errors.push(ValidationError::MissingStorageField("bucket"));
        }
        if storage.table.is_empty() {
            errors.push(ValidationError::MissingStorageField("table"));
        }
        if storage.region.is_empty() {
            errors.push(ValidationError::MissingStorageField("region"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RelayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.relay.path = "proxy".into();
        config.relay.upstream_timeout_secs = 0;
        config.storage.enabled = true;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidPath("proxy".into())));
        assert!(errors.contains(&ValidationError::ZeroTimeout { field: "relay.upstream_timeout_secs" }));
        assert!(errors.contains(&ValidationError::MissingStorageField("bucket")));
        assert!(errors.contains(&ValidationError::MissingStorageField("table")));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_relay_path_cannot_shadow_health() {
        let mut config = RelayConfig::default();
        config.relay.path = "/health".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::ReservedPath("/health".into())]);
    }

    #[test]
    fn test_relay_path_must_be_literal() {
        for path in ["/img/{id", "/img/{id}", "/img/}", "/img/*rest", "/{*path}"] {
            let mut config = RelayConfig::default();
            config.relay.path = path.into();

            let errors = validate_config(&config).unwrap_err();
            assert_eq!(errors, vec![ValidationError::PatternPath(path.into())], "{path}");
        }
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = RelayConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(validate_config(&config).unwrap_err().len(), 1);
    }
}
