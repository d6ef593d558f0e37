//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (validated, immutable)
//!     → AppConfig handed to the client, ProviderConfig to the SDK factory
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a new session needs a new client
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::AppConfig;
pub use schema::BridgeConfig;
pub use schema::ObservabilityConfig;
pub use schema::ProviderConfig;
