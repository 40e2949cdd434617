//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (SIM_AI_BASE_URL env override)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → passed by value into HttpServer at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload. The relay is
//!   stateless, so a restart is the reload path.
//! - All fields have defaults so an empty (or absent) config file works.
//! - Validation separates syntactic (serde) from semantic checks.

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::RelayConfig;
pub use schema::ListenerConfig;
pub use schema::UpstreamConfig;
