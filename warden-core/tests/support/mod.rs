#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use warden_core::{
    AccountRole, AccountService, AccountStore, AccountView, Argon2Settings, AuthCrypto,
    CallerIdentity, CreateAccountRequest, InMemoryAccountRepository, PasswordPolicy,
    RegistrationSettings,
};
use zeroize::Zeroizing;

pub const STAFF_PASSWORD: &str = "Abcdef1!";

/// Service over a fresh in-memory store with the cheapest Argon2 settings.
pub struct TestAccounts {
    pub service: AccountService,
    pub admin: CallerIdentity,
}

impl TestAccounts {
    pub fn new() -> Result<Self> {
        Self::with_registration(RegistrationSettings::default())
    }

    pub fn with_registration(registration: RegistrationSettings) -> Result<Self> {
        let crypto = AuthCrypto::with_settings("test-pepper", Argon2Settings::minimal())?;
        let store = AccountStore::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(crypto),
            PasswordPolicy::standard(),
        );

        Ok(Self {
            service: AccountService::new(store, registration),
            admin: CallerIdentity::new("admin-1", AccountRole::Admin)?,
        })
    }

    pub async fn create_staff(&self, username: &str, email: &str) -> Result<AccountView> {
        let view = self
            .service
            .create_account(Some(&self.admin), create_request(username, email))
            .await?;
        Ok(view)
    }
}

pub fn create_request(username: &str, email: &str) -> CreateAccountRequest {
    CreateAccountRequest {
        username: username.to_string(),
        email: email.to_string(),
        role: AccountRole::Staff,
        password: Zeroizing::new(STAFF_PASSWORD.to_string()),
    }
}

pub fn staff_caller(view: &AccountView) -> CallerIdentity {
    CallerIdentity::new(view.id.to_string(), AccountRole::Staff)
        .expect("account ids are never blank")
}
