//! Field and password validation entry points.
//!
//! Thin wrappers over the value-object constructors and the
//! [`PasswordPolicy`] so write paths can validate every field up front and
//! fail before touching the store.

use thiserror::Error;

use crate::auth::policy::{PasswordPolicy, PasswordPolicyError, ValidatedPassword};

use super::value_objects::{EmailAddress, EmailError, Username, UsernameError};

/// Any field-level rejection. Surfaces to callers as `ValidationFailed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Username(_) => "username",
            ValidationError::Email(_) => "email",
            ValidationError::Password(_) => "password",
        }
    }
}

pub fn validate_username(raw: &str) -> Result<Username, ValidationError> {
    Ok(Username::new(raw)?)
}

pub fn validate_email(raw: &str) -> Result<EmailAddress, ValidationError> {
    Ok(EmailAddress::new(raw)?)
}

pub fn validate_password(
    policy: &PasswordPolicy,
    raw: &str,
) -> Result<ValidatedPassword, ValidationError> {
    Ok(policy.validate(raw)?)
}
