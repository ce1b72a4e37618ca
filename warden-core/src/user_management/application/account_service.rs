use serde::{Deserialize, Serialize};
use tracing::warn;
use zeroize::Zeroizing;

use crate::auth::{
    AccessGrant, AccountOperation, AuthenticationError, CallerIdentity, authorize,
};
use crate::error::{AccountError, Result};
use crate::user_management::domain::{AccountId, AccountRole, AccountView};

use super::account_store::{AccountChanges, AccountStore, NewAccount};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationSettings {
    /// Let callers without an identity create accounts.
    pub allow_anonymous: bool,
}

#[derive(Clone, Deserialize)]
pub struct CreateAccountRequest {
    pub username: String,
    pub email: String,
    pub role: AccountRole,
    pub password: Zeroizing<String>,
}

impl std::fmt::Debug for CreateAccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateAccountRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<AccountRole>,
}

#[derive(Clone, Deserialize)]
pub struct PasswordChangeRequest {
    /// Ignored for admins, who may omit it.
    #[serde(default)]
    pub current_password: Zeroizing<String>,
    pub new_password: Zeroizing<String>,
}

impl std::fmt::Debug for PasswordChangeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordChangeRequest")
            .field("current_password", &"<redacted>")
            .field("new_password", &"<redacted>")
            .finish()
    }
}

/// Caller-facing account operations.
///
/// Every call runs in the same order: the access decision, then field
/// validation, then the store. A refused caller never learns whether the
/// input was valid or the target exists.
#[derive(Debug, Clone)]
pub struct AccountService {
    store: AccountStore,
    registration: RegistrationSettings,
}

impl AccountService {
    pub fn new(store: AccountStore, registration: RegistrationSettings) -> Self {
        Self {
            store,
            registration,
        }
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    pub async fn create_account(
        &self,
        caller: Option<&CallerIdentity>,
        request: CreateAccountRequest,
    ) -> Result<AccountView> {
        match caller {
            Some(caller) => {
                self.authorize(caller, AccountOperation::CreateAccount)?;
            }
            None if self.registration.allow_anonymous => {}
            None => return Err(AuthenticationError::Missing.into()),
        }

        let account = self
            .store
            .create(NewAccount {
                username: request.username,
                email: request.email,
                role: request.role,
                password: request.password,
            })
            .await?;
        Ok(account.view())
    }

    pub async fn list_accounts(
        &self,
        caller: &CallerIdentity,
    ) -> Result<Vec<AccountView>> {
        self.authorize(caller, AccountOperation::ListAccounts)?;
        let accounts = self.store.list().await?;
        Ok(accounts.iter().map(AccountView::from).collect())
    }

    pub async fn get_account(
        &self,
        caller: &CallerIdentity,
        id: AccountId,
    ) -> Result<AccountView> {
        self.authorize(caller, AccountOperation::ReadAccount(id))?;
        Ok(self.store.get(id).await?.view())
    }

    pub async fn update_account(
        &self,
        caller: &CallerIdentity,
        id: AccountId,
        request: UpdateAccountRequest,
    ) -> Result<AccountView> {
        self.authorize(caller, AccountOperation::UpdateAccount(id))?;
        let account = self
            .store
            .update(
                id,
                AccountChanges {
                    username: request.username,
                    email: request.email,
                    role: request.role,
                },
            )
            .await?;
        Ok(account.view())
    }

    pub async fn delete_account(
        &self,
        caller: &CallerIdentity,
        id: AccountId,
    ) -> Result<()> {
        self.authorize(caller, AccountOperation::DeleteAccount(id))?;
        self.store.delete(id).await
    }

    pub async fn change_password(
        &self,
        caller: &CallerIdentity,
        id: AccountId,
        request: PasswordChangeRequest,
    ) -> Result<AccountView> {
        let grant = self.authorize(caller, AccountOperation::ChangePassword(id))?;
        let new_password = self
            .store
            .password_policy()
            .validate(&request.new_password)
            .map_err(|err| AccountError::ValidationFailed(err.into()))?;

        let account = if grant.requires_current_password {
            self.store
                .change_password_proven(id, &request.current_password, &new_password)
                .await
                .inspect_err(|err| {
                    if *err == AccountError::IncorrectCurrentPassword {
                        warn!(
                            account_id = %id,
                            "password change rejected: current password mismatch"
                        );
                    }
                })?
        } else {
            self.store.change_password(id, &new_password).await?
        };
        Ok(account.view())
    }

    /// Run the access decision alone, for transports that must refuse a
    /// caller before they inspect the request body.
    pub fn check_access(
        &self,
        caller: Option<&CallerIdentity>,
        operation: AccountOperation,
    ) -> Result<AccessGrant> {
        match caller {
            Some(caller) => self.authorize(caller, operation),
            None if operation == AccountOperation::CreateAccount
                && self.registration.allow_anonymous =>
            {
                Ok(AccessGrant {
                    requires_current_password: false,
                })
            }
            None => Err(AuthenticationError::Missing.into()),
        }
    }

    fn authorize(
        &self,
        caller: &CallerIdentity,
        operation: AccountOperation,
    ) -> Result<AccessGrant> {
        authorize(caller, &operation).map_err(|denied| {
            warn!(
                caller_id = caller.id(),
                caller_role = %caller.role(),
                operation = %operation,
                target = ?operation.target().map(|id| id.to_string()),
                "access denied"
            );
            AccountError::AuthorizationDenied(denied)
        })
    }
}
