use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::CONFIG_PATH_VAR;
use crate::util::{non_blank, parse_bool};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub identity: FileIdentityConfig,
    #[serde(default)]
    pub registration: FileRegistrationConfig,
    #[serde(default)]
    pub logging: FileLoggingConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_pepper: Option<String>,
    #[serde(default)]
    pub argon2: FileArgon2Config,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileArgon2Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_kib: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileIdentityConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_header: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileRegistrationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_anonymous: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileLoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

/// Environment-derived configuration values.
///
/// Values that are present but cannot be parsed are left unset and their
/// variable names recorded in `rejected` so the loader can warn about them.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub auth_password_pepper: Option<String>,
    pub argon2_memory_kib: Option<u32>,
    pub argon2_iterations: Option<u32>,
    pub argon2_parallelism: Option<u32>,
    pub identity_id_header: Option<String>,
    pub identity_role_header: Option<String>,
    pub allow_anonymous_registration: Option<bool>,
    pub log_filter: Option<String>,
    pub log_json: Option<bool>,
    pub rejected: Vec<String>,
}

impl EnvConfig {
    /// Read through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rejected = Vec::new();
        let text = |name: &str| lookup(name).as_deref().and_then(non_blank);

        let parsed = |name: &'static str, rejected: &mut Vec<String>| {
            lookup(name).and_then(|raw| match raw.trim().parse::<u32>() {
                Ok(value) => Some(value),
                Err(_) => {
                    rejected.push(name.to_string());
                    None
                }
            })
        };

        let server_port = lookup("SERVER_PORT").and_then(|raw| {
            raw.trim().parse::<u16>().ok().or_else(|| {
                rejected.push("SERVER_PORT".to_string());
                None
            })
        });
        let argon2_memory_kib = parsed("AUTH_ARGON2_MEMORY_KIB", &mut rejected);
        let argon2_iterations = parsed("AUTH_ARGON2_ITERATIONS", &mut rejected);
        let argon2_parallelism = parsed("AUTH_ARGON2_PARALLELISM", &mut rejected);

        let mut flag = |name: &'static str| {
            lookup(name).and_then(|raw| {
                parse_bool(&raw).or_else(|| {
                    rejected.push(name.to_string());
                    None
                })
            })
        };
        let allow_anonymous_registration = flag("ALLOW_ANONYMOUS_REGISTRATION");
        let log_json = flag("LOG_JSON");

        Self {
            config_path: text(CONFIG_PATH_VAR).map(PathBuf::from),
            server_host: text("SERVER_HOST"),
            server_port,
            auth_password_pepper: lookup("AUTH_PASSWORD_PEPPER"),
            argon2_memory_kib,
            argon2_iterations,
            argon2_parallelism,
            identity_id_header: text("IDENTITY_ID_HEADER"),
            identity_role_header: text("IDENTITY_ROLE_HEADER"),
            allow_anonymous_registration,
            log_filter: text("LOG_FILTER"),
            log_json,
            rejected,
        }
    }
}
