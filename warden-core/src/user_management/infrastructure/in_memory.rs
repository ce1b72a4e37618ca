use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::user_management::domain::{
    aggregates::{Account, AccountId, AccountPatch, find_duplicate},
    repositories::{AccountRepository, AccountRepositoryError},
};

/// Default in-memory implementation of [`AccountRepository`].
///
/// A single `RwLock` guards the whole set: writers hold the write guard from
/// the uniqueness scan through the mutation, readers share the read guard.
/// Records are kept in insertion order.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<Vec<Account>>,
}

impl fmt::Debug for InMemoryAccountRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("InMemoryAccountRepository");

        match self.accounts.try_read() {
            Ok(accounts) => {
                debug.field("accounts", &accounts.len());
            }
            Err(_) => {
                debug.field("accounts", &"<locked>");
            }
        }

        debug.finish()
    }
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn position(accounts: &[Account], id: AccountId) -> Option<usize> {
    accounts.iter().position(|account| account.id == id)
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(
        &self,
        account: Account,
    ) -> Result<Account, AccountRepositoryError> {
        let mut accounts = self.accounts.write().await;

        if let Some(field) =
            find_duplicate(accounts.iter(), &account.username, &account.email, None)
        {
            return Err(AccountRepositoryError::Duplicate(field));
        }
        if position(&accounts, account.id).is_some() {
            return Err(AccountRepositoryError::Internal(format!(
                "account id {} already present",
                account.id
            )));
        }

        accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_id(
        &self,
        id: AccountId,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|account| account.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        Ok(self.accounts.read().await.clone())
    }

    async fn update(
        &self,
        id: AccountId,
        patch: AccountPatch,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountRepositoryError> {
        let mut accounts = self.accounts.write().await;
        let index =
            position(&accounts, id).ok_or(AccountRepositoryError::NotFound)?;

        let current = &accounts[index];
        let username = patch.username.as_ref().unwrap_or(&current.username);
        let email = patch.email.as_ref().unwrap_or(&current.email);
        if let Some(field) =
            find_duplicate(accounts.iter(), username, email, Some(id))
        {
            return Err(AccountRepositoryError::Duplicate(field));
        }

        let account = &mut accounts[index];
        account.apply(patch);
        account.touch(now);
        Ok(account.clone())
    }

    async fn replace_credential(
        &self,
        id: AccountId,
        expected_current: Option<String>,
        credential_hash: String,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountRepositoryError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|account| account.id == id)
            .ok_or(AccountRepositoryError::NotFound)?;

        if let Some(expected) = expected_current
            && account.credential_hash() != expected
        {
            return Err(AccountRepositoryError::CredentialChanged);
        }

        account.set_credential_hash(credential_hash);
        account.touch(now);
        Ok(account.clone())
    }

    async fn delete(&self, id: AccountId) -> Result<(), AccountRepositoryError> {
        let mut accounts = self.accounts.write().await;
        let index =
            position(&accounts, id).ok_or(AccountRepositoryError::NotFound)?;
        accounts.remove(index);
        Ok(())
    }
}
