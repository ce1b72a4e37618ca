//! Configuration library for Warden.
//!
//! Loads server, credential-hashing, identity and logging settings from
//! built-in defaults, an optional TOML file, an optional `.env` file and the
//! process environment, then applies guard rails before handing the result to
//! the server.

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader};
pub use models::{
    AuthConfig, Config, ConfigMetadata, IdentityConfig, LoggingConfig,
    RegistrationConfig, ServerConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
