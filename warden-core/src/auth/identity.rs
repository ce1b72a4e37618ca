use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::user_management::domain::{AccountId, AccountRole};

/// The asserted `{id, role}` of whoever is making a request.
///
/// How the pair is obtained is up to the transport. Holding one only means
/// the assertion was well formed; it says nothing about whether the caller
/// proved it.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CallerIdentity {
    id: String,
    role: AccountRole,
}

impl CallerIdentity {
    pub fn new(
        id: impl Into<String>,
        role: AccountRole,
    ) -> Result<Self, AuthenticationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AuthenticationError::Missing);
        }
        Ok(Self { id, role })
    }

    /// Build an identity from raw asserted values.
    ///
    /// Absent or blank values are [`AuthenticationError::Missing`]; a role
    /// other than `admin`/`staff` is [`AuthenticationError::UnrecognizedRole`].
    pub fn from_assertion(
        id: Option<&str>,
        role: Option<&str>,
    ) -> Result<Self, AuthenticationError> {
        let (Some(id), Some(role)) = (id, role) else {
            return Err(AuthenticationError::Missing);
        };
        if id.trim().is_empty() || role.trim().is_empty() {
            return Err(AuthenticationError::Missing);
        }
        let role = role
            .parse::<AccountRole>()
            .map_err(|err| AuthenticationError::UnrecognizedRole(err.0))?;
        Self::new(id, role)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> AccountRole {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether the caller asserts to be the given account.
    pub fn is_account(&self, account_id: AccountId) -> bool {
        self.id
            .parse::<AccountId>()
            .is_ok_and(|own| own == account_id)
    }
}

impl fmt::Debug for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallerIdentity")
            .field("id", &self.id)
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    #[error("caller identity is missing")]
    Missing,

    #[error("unrecognized role: {0}")]
    UnrecognizedRole(String),
}

impl AuthenticationError {
    /// Treat a missing identity as anonymous while still failing on
    /// garbled assertions.
    pub fn optional(
        resolved: Result<CallerIdentity, AuthenticationError>,
    ) -> Result<Option<CallerIdentity>, AuthenticationError> {
        match resolved {
            Ok(identity) => Ok(Some(identity)),
            Err(AuthenticationError::Missing) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_well_formed_assertions() {
        let caller =
            CallerIdentity::from_assertion(Some("admin-1"), Some("admin")).unwrap();
        assert_eq!(caller.id(), "admin-1");
        assert!(caller.is_admin());

        let caller = CallerIdentity::from_assertion(Some("u-a"), Some("staff")).unwrap();
        assert_eq!(caller.role(), AccountRole::Staff);
    }

    #[test]
    fn missing_parts_are_missing() {
        assert_eq!(
            CallerIdentity::from_assertion(None, Some("admin")),
            Err(AuthenticationError::Missing)
        );
        assert_eq!(
            CallerIdentity::from_assertion(Some("u-a"), None),
            Err(AuthenticationError::Missing)
        );
        assert_eq!(
            CallerIdentity::from_assertion(Some("  "), Some("staff")),
            Err(AuthenticationError::Missing)
        );
        assert_eq!(
            CallerIdentity::from_assertion(Some("u-a"), Some("")),
            Err(AuthenticationError::Missing)
        );
    }

    #[test]
    fn unknown_roles_fail_authentication() {
        assert_eq!(
            CallerIdentity::from_assertion(Some("u-a"), Some("root")),
            Err(AuthenticationError::UnrecognizedRole("root".to_string()))
        );
    }

    #[test]
    fn account_match_requires_same_uuid() {
        let id = AccountId::new();
        let caller =
            CallerIdentity::new(id.to_string().to_uppercase(), AccountRole::Staff)
                .unwrap();
        assert!(caller.is_account(id));
        assert!(!caller.is_account(AccountId::new()));

        let opaque = CallerIdentity::new("u-a", AccountRole::Staff).unwrap();
        assert!(!opaque.is_account(id));
    }

    #[test]
    fn optional_only_swallows_missing() {
        assert_eq!(
            AuthenticationError::optional(Err(AuthenticationError::Missing)),
            Ok(None)
        );
        assert!(
            AuthenticationError::optional(Err(
                AuthenticationError::UnrecognizedRole("x".into())
            ))
            .is_err()
        );
    }
}
