use axum::http::header::HeaderName;
use thiserror::Error;

use super::models::{AuthConfig, Config, IdentityConfig};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("authentication secret {field} {reason}")]
    WeakSecret { field: &'static str, reason: String },
    #[error("server port must be non-zero")]
    InvalidPort,
    #[error("invalid header name `{value}` in {field}")]
    InvalidHeaderName { field: &'static str, value: String },
    #[error("identity id and role headers must differ (both `{0}`)")]
    DuplicateIdentityHeader(String),
    #[error("invalid Argon2 parameters: {reason}")]
    InvalidArgon2 { reason: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.items.iter().any(|item| item.message.contains(needle))
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.server.port == 0 {
        return Err(ConfigGuardRailError::InvalidPort);
    }

    enforce_secret(&config.auth, &mut warnings)?;
    validate_identity(&config.identity)?;

    if config.registration.allow_anonymous {
        warnings.push_with_hint(
            "ALLOW_ANONYMOUS_REGISTRATION is enabled; anyone can create accounts",
            "Disable it unless open sign-up is intended",
        );
    }

    Ok(warnings)
}

fn enforce_secret(
    auth: &AuthConfig,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    if auth.password_pepper.is_empty() {
        return Err(ConfigGuardRailError::WeakSecret {
            field: "AUTH_PASSWORD_PEPPER",
            reason: "must not be empty".into(),
        });
    }

    if auth.is_default_pepper() {
        warnings.push_with_hint(
            "AUTH_PASSWORD_PEPPER uses the default placeholder value",
            "Set AUTH_PASSWORD_PEPPER to a long random secret before storing real accounts",
        );
    }

    auth.argon2.to_params().map_err(|err| {
        ConfigGuardRailError::InvalidArgon2 {
            reason: err.to_string(),
        }
    })?;

    Ok(())
}

fn validate_identity(identity: &IdentityConfig) -> Result<(), ConfigGuardRailError> {
    for (field, value) in [
        ("IDENTITY_ID_HEADER", &identity.id_header),
        ("IDENTITY_ROLE_HEADER", &identity.role_header),
    ] {
        HeaderName::from_bytes(value.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidHeaderName {
                field,
                value: value.clone(),
            }
        })?;
    }

    if identity.id_header.eq_ignore_ascii_case(&identity.role_header) {
        return Err(ConfigGuardRailError::DuplicateIdentityHeader(
            identity.id_header.clone(),
        ));
    }

    Ok(())
}
