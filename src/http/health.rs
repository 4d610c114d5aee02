//! Liveness endpoint.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::http::server::AppState;

pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

/// `GET /health`. Checks backing services when they are enabled and
/// answers 503 if they stopped responding.
pub async fn get_health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let Some(services) = state.services.as_deref() else {
        return (
            StatusCode::OK,
            Json(HealthStatus {
                status: "ok",
                version: env!("CARGO_PKG_VERSION"),
                storage: "disabled",
                table: None,
                bucket: None,
            }),
        );
    };

    let (code, status, storage) = match services.check_reachable().await {
        Ok(()) => (StatusCode::OK, "ok", "connected"),
        Err(e) => {
            tracing::warn!(error = %e, "Backing services unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
        }
    };

    (
        code,
        Json(HealthStatus {
            status,
            version: env!("CARGO_PKG_VERSION"),
            storage,
            table: Some(services.table().to_string()),
            bucket: Some(services.bucket().to_string()),
        }),
    )
}
