//! Role-based access decisions for account operations.
//!
//! Two roles exist. Admins may do everything. Any authenticated caller may
//! create accounts. Staff may otherwise only read and update their own record
//! and change their own password after proving the current one.

use std::fmt;

use thiserror::Error;

use crate::user_management::domain::AccountId;

use super::identity::CallerIdentity;

/// An account operation together with its target, when it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountOperation {
    CreateAccount,
    ListAccounts,
    ReadAccount(AccountId),
    UpdateAccount(AccountId),
    DeleteAccount(AccountId),
    ChangePassword(AccountId),
}

impl AccountOperation {
    pub fn name(&self) -> &'static str {
        match self {
            AccountOperation::CreateAccount => "create_account",
            AccountOperation::ListAccounts => "list_accounts",
            AccountOperation::ReadAccount(_) => "read_account",
            AccountOperation::UpdateAccount(_) => "update_account",
            AccountOperation::DeleteAccount(_) => "delete_account",
            AccountOperation::ChangePassword(_) => "change_password",
        }
    }

    pub fn target(&self) -> Option<AccountId> {
        match self {
            AccountOperation::CreateAccount | AccountOperation::ListAccounts => None,
            AccountOperation::ReadAccount(id)
            | AccountOperation::UpdateAccount(id)
            | AccountOperation::DeleteAccount(id)
            | AccountOperation::ChangePassword(id) => Some(*id),
        }
    }
}

impl fmt::Display for AccountOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A permitted operation. Carries any extra proof the caller still owes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessGrant {
    /// The caller must present the target's current password.
    pub requires_current_password: bool,
}

impl AccessGrant {
    const UNCONDITIONAL: Self = Self {
        requires_current_password: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    AdminRequired,
    NotOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{operation} denied: {reason}")]
pub struct AccessDenied {
    pub operation: &'static str,
    pub reason: DenialReason,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::AdminRequired => f.write_str("admin role required"),
            DenialReason::NotOwner => {
                f.write_str("staff may only act on their own account")
            }
        }
    }
}

/// Decide whether `caller` may perform `operation`.
///
/// Pure: depends only on the caller's role and whether the caller id names
/// the target. Existence of the target is not considered here.
pub fn authorize(
    caller: &CallerIdentity,
    operation: &AccountOperation,
) -> Result<AccessGrant, AccessDenied> {
    if caller.is_admin() {
        return Ok(AccessGrant::UNCONDITIONAL);
    }

    let deny = |reason| AccessDenied {
        operation: operation.name(),
        reason,
    };

    match operation {
        AccountOperation::CreateAccount => Ok(AccessGrant::UNCONDITIONAL),
        AccountOperation::ListAccounts | AccountOperation::DeleteAccount(_) => {
            Err(deny(DenialReason::AdminRequired))
        }
        AccountOperation::ReadAccount(id) | AccountOperation::UpdateAccount(id) => {
            if caller.is_account(*id) {
                Ok(AccessGrant::UNCONDITIONAL)
            } else {
                Err(deny(DenialReason::NotOwner))
            }
        }
        AccountOperation::ChangePassword(id) => {
            if caller.is_account(*id) {
                Ok(AccessGrant {
                    requires_current_password: true,
                })
            } else {
                Err(deny(DenialReason::NotOwner))
            }
        }
    }
}
