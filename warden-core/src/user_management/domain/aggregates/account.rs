use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user_management::domain::value_objects::{
    AccountRole, EmailAddress, Username,
};

/// Opaque account identifier, generated by the store and never reassigned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AccountId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stored account record.
///
/// Holds the credential hash, so it deliberately does not implement
/// `Serialize`; everything leaving the core goes through [`AccountView`].
#[derive(Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: Username,
    pub email: EmailAddress,
    pub role: AccountRole,
    pub(crate) credential_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        username: Username,
        email: EmailAddress,
        role: AccountRole,
        credential_hash: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            username,
            email,
            role,
            credential_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn credential_hash(&self) -> &str {
        &self.credential_hash
    }

    pub fn view(&self) -> AccountView {
        AccountView::from(self)
    }

    pub fn apply(&mut self, patch: AccountPatch) {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }

    pub fn set_credential_hash(&mut self, credential_hash: String) {
        self.credential_hash = credential_hash;
    }

    /// Refresh `updated_at`, always moving it strictly forward.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::nanoseconds(1)
        };
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("credential_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Linear uniqueness scan over live accounts.
///
/// Username collisions anywhere in the set are reported before email
/// collisions. `exclude` skips the record being updated so unchanged fields
/// never collide with themselves. Emails compare ASCII-case-insensitively.
pub fn find_duplicate<'a, I>(
    accounts: I,
    username: &Username,
    email: &EmailAddress,
    exclude: Option<AccountId>,
) -> Option<DuplicateField>
where
    I: IntoIterator<Item = &'a Account>,
    I::IntoIter: Clone,
{
    let candidates = accounts
        .into_iter()
        .filter(move |account| Some(account.id) != exclude);

    if candidates.clone().any(|account| account.username == *username) {
        Some(DuplicateField::Username)
    } else if candidates
        .into_iter()
        .any(|account| account.email.same_address(email))
    {
        Some(DuplicateField::Email)
    } else {
        None
    }
}

/// Outward-facing projection of an [`Account`]; never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.as_str().to_string(),
            email: account.email.as_str().to_string(),
            role: account.role,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Validated fields of a partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPatch {
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
    pub role: Option<AccountRole>,
}

/// Which unique field a write collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateField {
    Username,
    Email,
}

impl DuplicateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateField::Username => "username",
            DuplicateField::Email => "email",
        }
    }
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
