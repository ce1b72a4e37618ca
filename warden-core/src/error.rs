use thiserror::Error;

use crate::auth::{AccessDenied, AuthCryptoError, AuthenticationError};
use crate::user_management::domain::{
    AccountRepositoryError, DuplicateField, ValidationError,
};

/// Every way an account operation can fail.
///
/// Variants map one-to-one onto the failure kinds callers are expected to
/// distinguish; anything unexpected collapses into `Internal`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("authentication required: {0}")]
    AuthenticationMissing(#[from] AuthenticationError),

    #[error("access denied: {0}")]
    AuthorizationDenied(#[from] AccessDenied),

    #[error("{0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("{0} already exists")]
    DuplicateField(DuplicateField),

    #[error("account not found")]
    NotFound,

    #[error("current password is incorrect")]
    IncorrectCurrentPassword,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AccountRepositoryError> for AccountError {
    fn from(err: AccountRepositoryError) -> Self {
        match err {
            AccountRepositoryError::NotFound => AccountError::NotFound,
            AccountRepositoryError::Duplicate(field) => {
                AccountError::DuplicateField(field)
            }
            // The proven password is no longer the current one.
            AccountRepositoryError::CredentialChanged => {
                AccountError::IncorrectCurrentPassword
            }
            AccountRepositoryError::Internal(message) => {
                AccountError::Internal(message)
            }
        }
    }
}

impl From<AuthCryptoError> for AccountError {
    fn from(err: AuthCryptoError) -> Self {
        AccountError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AccountError>;
