use serde::{Deserialize, Serialize};

/// Account role enumeration for role-based access control
///
/// Defines the roles an account can hold. Role names are matched exactly and
/// in lowercase; anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Administrator with full access
    /// - Can list, read and update every account
    /// - Can delete accounts
    /// - Can reset any password without knowing the current one
    Admin,

    /// Staff member with self-service access
    /// - Can read and update their own account
    /// - Can change their own password when supplying the current one
    Staff,
}

impl AccountRole {
    /// Check if this role can access admin features
    pub fn is_admin(&self) -> bool {
        matches!(self, AccountRole::Admin)
    }

    /// Get all available roles
    pub fn all() -> &'static [AccountRole] {
        &[AccountRole::Admin, AccountRole::Staff]
    }

    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Admin => "admin",
            AccountRole::Staff => "staff",
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is not one of `admin`/`staff`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized role: {0}")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for AccountRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(AccountRole::Admin),
            "staff" => Ok(AccountRole::Staff),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}
