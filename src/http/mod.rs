//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (x-request-id assigned and echoed)
//!     → relay handlers / health.rs
//!     → response.rs (CORS, cache headers, JSON errors)
//!     → Send to client
//! ```

pub mod health;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
