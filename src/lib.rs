//! VoiceCake Relay Library
//!
//! A stateless HTTP reverse-proxy relay that forwards dashboard REST calls to
//! an upstream Sim AI backend, injecting trust context and reproducing the
//! upstream response as faithfully as HTTP allows.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
