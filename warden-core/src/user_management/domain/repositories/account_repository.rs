use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::user_management::domain::aggregates::{
    Account, AccountId, AccountPatch, DuplicateField,
};

/// Storage port for account records.
///
/// Implementations own the authoritative account set and must make every
/// write's uniqueness check and mutation a single atomic step relative to
/// other writers. Readers must never observe a half-applied write. A failed
/// write leaves the set unchanged.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account if neither its username nor email is taken.
    async fn insert(
        &self,
        account: Account,
    ) -> Result<Account, AccountRepositoryError>;

    /// Find an account by its identifier
    async fn find_by_id(
        &self,
        id: AccountId,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Snapshot of all live accounts in insertion order
    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError>;

    /// Apply a partial update after re-checking uniqueness of the effective
    /// username and email, excluding the target itself.
    async fn update(
        &self,
        id: AccountId,
        patch: AccountPatch,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountRepositoryError>;

    /// Swap the stored credential hash.
    ///
    /// With `expected_current` set, the swap only happens if the stored hash
    /// is still that value; otherwise it fails with `CredentialChanged`.
    async fn replace_credential(
        &self,
        id: AccountId,
        expected_current: Option<String>,
        credential_hash: String,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountRepositoryError>;

    /// Permanently remove an account.
    async fn delete(&self, id: AccountId) -> Result<(), AccountRepositoryError>;
}

/// Errors that can occur during repository operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountRepositoryError {
    #[error("account not found")]
    NotFound,

    #[error("{0} already exists")]
    Duplicate(DuplicateField),

    #[error("stored credential changed concurrently")]
    CredentialChanged,

    #[error("internal storage error: {0}")]
    Internal(String),
}

impl AccountRepositoryError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AccountRepositoryError::NotFound)
    }
}
