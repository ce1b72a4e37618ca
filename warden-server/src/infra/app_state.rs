use std::{fmt, sync::Arc};

use axum::http::header::InvalidHeaderName;
use thiserror::Error;
use warden_config::Config;
use warden_core::{
    AccountService, AccountStore, AuthCrypto, AuthCryptoError, InMemoryAccountRepository,
    PasswordPolicy, RegistrationSettings,
};

use crate::identity::{HeaderIdentityResolver, IdentityResolver};

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub identity: Arc<dyn IdentityResolver>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum AppStateError {
    #[error("failed to initialise password hashing: {0}")]
    Crypto(#[from] AuthCryptoError),
    #[error("invalid identity header name: {0}")]
    IdentityHeader(#[from] InvalidHeaderName),
}

impl AppState {
    pub fn new(accounts: AccountService, identity: Arc<dyn IdentityResolver>) -> Self {
        Self {
            accounts: Arc::new(accounts),
            identity,
        }
    }

    /// Wire the in-memory store, hashing and header identity resolver from
    /// loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, AppStateError> {
        let crypto =
            AuthCrypto::with_settings(&config.auth.password_pepper, config.auth.argon2)?;
        let store = AccountStore::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(crypto),
            PasswordPolicy::standard(),
        );
        let service = AccountService::new(
            store,
            RegistrationSettings {
                allow_anonymous: config.registration.allow_anonymous,
            },
        );
        let resolver = HeaderIdentityResolver::new(
            &config.identity.id_header,
            &config.identity.role_header,
        )?;

        Ok(Self::new(service, Arc::new(resolver)))
    }
}
