use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;
use warden_core::Argon2Settings;

use super::{
    constants::{
        DEFAULT_HOST, DEFAULT_ID_HEADER, DEFAULT_LOG_FILTER, DEFAULT_PASSWORD_PEPPER,
        DEFAULT_PORT, DEFAULT_ROLE_HEADER,
    },
    models::{
        AuthConfig, Config, ConfigMetadata, IdentityConfig, LoggingConfig,
        RegistrationConfig, ServerConfig,
        sources::{EnvConfig, FileConfig},
    },
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("warden.toml"),
        PathBuf::from("config/warden.toml"),
    ]
});

const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Default, Clone)]
struct ConfigLoaderOptions {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
    /// Use these variables instead of the process environment.
    env_vars: Option<HashMap<String, String>>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.options.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Resolve the effective configuration.
    ///
    /// Precedence, lowest first: built-in defaults, the TOML file, the `.env`
    /// file, then the environment. The `.env` file never overrides a
    /// variable that is already set.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file = self.read_env_file()?;
        let env_file_loaded = env_file.is_some();
        let env_file = env_file.unwrap_or_default();

        let env_config = match &self.options.env_vars {
            Some(vars) => EnvConfig::from_lookup(|name| {
                vars.get(name).or_else(|| env_file.get(name)).cloned()
            }),
            None => EnvConfig::from_lookup(|name| {
                std::env::var(name)
                    .ok()
                    .or_else(|| env_file.get(name).cloned())
            }),
        };

        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let (config, warnings) =
            self.compose_config(file_config, env_config, config_path, env_file_loaded)?;

        Ok(ConfigLoad { config, warnings })
    }

    fn read_env_file(
        &self,
    ) -> Result<Option<HashMap<String, String>>, ConfigLoadError> {
        let path = self
            .options
            .env_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));

        let iter = match dotenvy::from_path_iter(&path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(_)) => return Ok(None),
            Err(source) => return Err(ConfigLoadError::EnvFile { path, source }),
        };

        let mut vars = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|source| ConfigLoadError::EnvFile {
                path: path.clone(),
                source,
            })?;
            vars.insert(key, value);
        }
        debug!(path = %path.display(), count = vars.len(), "read env file");
        Ok(Some(vars))
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let (path, explicit) = if let Some(explicit) = &self.options.config_path {
            (Some(explicit.clone()), true)
        } else if let Some(from_env) = &env_config.config_path {
            (Some(from_env.clone()), true)
        } else {
            (
                DEFAULT_CONFIG_LOCATIONS
                    .iter()
                    .find(|candidate| candidate.exists())
                    .cloned(),
                false,
            )
        };

        let Some(path) = path else {
            return Ok((None, None));
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let file_config = Self::read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }

    fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
        env_file_loaded: bool,
    ) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if config_path.is_none() {
            warnings.push_with_hint(
                "No warden.toml detected; using environment variables and defaults",
                "Create warden.toml or set WARDEN_CONFIG to point at one",
            );
        }
        for name in &env.rejected {
            warnings.push(format!("ignoring unparsable value for {name}"));
        }

        let FileConfig {
            server: file_server,
            auth: file_auth,
            identity: file_identity,
            registration: file_registration,
            logging: file_logging,
        } = file_config.unwrap_or_default();

        let server = ServerConfig {
            host: env
                .server_host
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        };

        let defaults = Argon2Settings::default();
        let auth = AuthConfig {
            password_pepper: env
                .auth_password_pepper
                .or(file_auth.password_pepper)
                .unwrap_or_else(|| DEFAULT_PASSWORD_PEPPER.to_string()),
            argon2: Argon2Settings {
                memory_kib: env
                    .argon2_memory_kib
                    .or(file_auth.argon2.memory_kib)
                    .unwrap_or(defaults.memory_kib),
                iterations: env
                    .argon2_iterations
                    .or(file_auth.argon2.iterations)
                    .unwrap_or(defaults.iterations),
                parallelism: env
                    .argon2_parallelism
                    .or(file_auth.argon2.parallelism)
                    .unwrap_or(defaults.parallelism),
            },
        };

        let identity = IdentityConfig {
            id_header: env
                .identity_id_header
                .or(file_identity.id_header)
                .unwrap_or_else(|| DEFAULT_ID_HEADER.to_string())
                .to_ascii_lowercase(),
            role_header: env
                .identity_role_header
                .or(file_identity.role_header)
                .unwrap_or_else(|| DEFAULT_ROLE_HEADER.to_string())
                .to_ascii_lowercase(),
        };

        let registration = RegistrationConfig {
            allow_anonymous: env
                .allow_anonymous_registration
                .or(file_registration.allow_anonymous)
                .unwrap_or(false),
        };

        let logging = LoggingConfig {
            filter: env
                .log_filter
                .or(file_logging.filter)
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            json: env.log_json.or(file_logging.json).unwrap_or(false),
        };

        let config = Config {
            server,
            auth,
            identity,
            registration,
            logging,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        };

        let guard_warnings = validation::apply_guard_rails(&config)?;
        warnings.extend(guard_warnings);

        Ok((config, warnings))
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to read env file {path}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
}
