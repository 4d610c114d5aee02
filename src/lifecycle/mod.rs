//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Logging → Backing services → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight relays → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: backing service construction failure is fatal
//! - Listener binds last, after every dependency is ready
//! - In-flight streams are bounded by the upstream timeout, so draining ends

pub mod shutdown;
pub mod signals;

pub use shutdown::{recv_shutdown, Shutdown};
