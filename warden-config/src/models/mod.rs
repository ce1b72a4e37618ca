pub mod sources;

use std::fmt;
use std::path::PathBuf;

use warden_core::Argon2Settings;

use crate::constants::DEFAULT_PASSWORD_PEPPER;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub identity: IdentityConfig,
    pub registration: RegistrationConfig,
    pub logging: LoggingConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    pub password_pepper: String,
    pub argon2: Argon2Settings,
}

impl AuthConfig {
    pub fn is_default_pepper(&self) -> bool {
        self.password_pepper == DEFAULT_PASSWORD_PEPPER
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("password_pepper", &"<redacted>")
            .field("argon2", &self.argon2)
            .finish()
    }
}

/// Header names the reference identity resolver reads the asserted caller
/// id and role from.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub id_header: String,
    pub role_header: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationConfig {
    pub allow_anonymous: bool,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: String,
    pub json: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
