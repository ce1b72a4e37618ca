use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::auth::{AuthCrypto, PasswordPolicy, ValidatedPassword};
use crate::error::{AccountError, Result};
use crate::user_management::domain::{
    Account, AccountId, AccountPatch, AccountRepository, AccountRole,
    validate_email, validate_password, validate_username,
};

/// Account store: validates fields, hashes credentials and applies every
/// write through the [`AccountRepository`].
///
/// Knows nothing about callers. Access decisions happen one layer up in
/// [`super::AccountService`].
#[derive(Clone)]
pub struct AccountStore {
    accounts: Arc<dyn AccountRepository>,
    crypto: Arc<AuthCrypto>,
    policy: PasswordPolicy,
}

impl std::fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("accounts_repo", &Arc::strong_count(&self.accounts))
            .field("policy", &self.policy)
            .finish()
    }
}

/// Raw create input. Every field is validated before anything is hashed.
#[derive(Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub role: AccountRole,
    pub password: Zeroizing<String>,
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw partial update input. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<AccountRole>,
}

impl AccountStore {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        crypto: Arc<AuthCrypto>,
        policy: PasswordPolicy,
    ) -> Self {
        Self {
            accounts,
            crypto,
            policy,
        }
    }

    pub fn password_policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    pub async fn create(&self, input: NewAccount) -> Result<Account> {
        let username = validate_username(&input.username)?;
        let email = validate_email(&input.email)?;
        let password = validate_password(&self.policy, &input.password)?;

        // Hashing is slow; it runs before the repository takes its write lock.
        let credential_hash = self.hash(&password).await?;
        let account =
            Account::new(username, email, input.role, credential_hash, Utc::now());

        let account = self.accounts.insert(account).await?;
        info!(
            account_id = %account.id,
            username = %account.username,
            role = %account.role,
            "account created"
        );
        Ok(account)
    }

    pub async fn get(&self, id: AccountId) -> Result<Account> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.list().await?)
    }

    pub async fn update(
        &self,
        id: AccountId,
        changes: AccountChanges,
    ) -> Result<Account> {
        let patch = AccountPatch {
            username: changes
                .username
                .as_deref()
                .map(validate_username)
                .transpose()?,
            email: changes.email.as_deref().map(validate_email).transpose()?,
            role: changes.role,
        };

        let account = self.accounts.update(id, patch, Utc::now()).await?;
        info!(
            account_id = %account.id,
            username = %account.username,
            role = %account.role,
            "account updated"
        );
        Ok(account)
    }

    pub async fn delete(&self, id: AccountId) -> Result<()> {
        self.accounts.delete(id).await?;
        info!(account_id = %id, "account deleted");
        Ok(())
    }

    /// Replace the stored credential. The password has already passed the
    /// policy, which the type guarantees.
    pub async fn change_password(
        &self,
        id: AccountId,
        password: &ValidatedPassword,
    ) -> Result<Account> {
        let credential_hash = self.hash(password).await?;
        let account = self
            .accounts
            .replace_credential(id, None, credential_hash, Utc::now())
            .await?;
        info!(account_id = %id, "account password changed");
        Ok(account)
    }

    /// Replace the stored credential only if `current` matches it.
    ///
    /// Verification and hashing run outside the repository lock, so the swap
    /// is conditional on the hash that was verified still being stored. A
    /// credential reset in between fails as `IncorrectCurrentPassword`.
    pub async fn change_password_proven(
        &self,
        id: AccountId,
        current: &str,
        password: &ValidatedPassword,
    ) -> Result<Account> {
        let verified_hash = self.get(id).await?.credential_hash().to_string();
        if !self.matches(current, &verified_hash).await? {
            return Err(AccountError::IncorrectCurrentPassword);
        }

        let credential_hash = self.hash(password).await?;
        let account = self
            .accounts
            .replace_credential(id, Some(verified_hash), credential_hash, Utc::now())
            .await?;
        info!(account_id = %id, "account password changed");
        Ok(account)
    }

    /// Check a candidate password against the stored hash.
    pub async fn verify_password(&self, id: AccountId, candidate: &str) -> Result<bool> {
        let account = self.get(id).await?;
        let matches = self.matches(candidate, account.credential_hash()).await?;
        debug!(account_id = %id, matches, "password verification");
        Ok(matches)
    }

    async fn matches(&self, candidate: &str, stored: &str) -> Result<bool> {
        let crypto = Arc::clone(&self.crypto);
        let candidate = Zeroizing::new(candidate.to_string());
        let stored = stored.to_string();

        let matches = tokio::task::spawn_blocking(move || {
            crypto.verify_password(&candidate, &stored)
        })
        .await
        .map_err(|err| AccountError::Internal(err.to_string()))??;
        Ok(matches)
    }

    async fn hash(&self, password: &ValidatedPassword) -> Result<String> {
        let crypto = Arc::clone(&self.crypto);
        let password = Zeroizing::new(password.expose().to_string());

        let hash = tokio::task::spawn_blocking(move || crypto.hash_password(&password))
            .await
            .map_err(|err| AccountError::Internal(err.to_string()))??;
        Ok(hash)
    }
}
