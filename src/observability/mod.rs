//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay and server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tower-http TraceLayer spans carrying x-request-id
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
