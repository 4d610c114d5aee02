//! Image relay service library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod storage;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use storage::BackingServices;
