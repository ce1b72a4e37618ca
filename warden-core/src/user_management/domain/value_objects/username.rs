use serde::{Deserialize, Serialize};
use std::fmt;

/// Username value object with validation
///
/// Represents a validated username that follows the business rules:
/// - 6-15 characters in length
/// - Lowercase ASCII letters and digits only
///
/// Input is taken as-is: no trimming and no case folding, so `"Alice1"` is
/// rejected rather than normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub const MIN_LENGTH: usize = 6;
    pub const MAX_LENGTH: usize = 15;

    /// Create a new username with validation
    pub fn new(username: impl AsRef<str>) -> Result<Self, UsernameError> {
        let username = username.as_ref();

        if !username
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(UsernameError::InvalidCharacters);
        }

        // ASCII-only from here on, so byte length equals character count
        if username.len() < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort);
        }

        if username.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong);
        }

        Ok(Self(username.to_string()))
    }

    /// Get the username as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Errors that can occur when creating a username
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    #[error("Username too short: minimum 6 characters required")]
    TooShort,

    #[error("Username too long: maximum 15 characters allowed")]
    TooLong,

    #[error(
        "Username contains invalid characters: only lowercase letters and digits allowed"
    )]
    InvalidCharacters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_usernames() {
        assert!(Username::new("ayu123").is_ok());
        assert!(Username::new("budi999").is_ok());
        assert!(Username::new("123456").is_ok());
        assert!(Username::new("abcdefghijklmno").is_ok());
    }

    #[test]
    fn invalid_usernames() {
        assert_eq!(Username::new("ayu12"), Err(UsernameError::TooShort));
        assert_eq!(Username::new(""), Err(UsernameError::TooShort));
        assert_eq!(
            Username::new("abcdefghijklmnop"),
            Err(UsernameError::TooLong)
        );
        assert_eq!(
            Username::new("Ayu123"),
            Err(UsernameError::InvalidCharacters)
        );
        assert_eq!(
            Username::new("ayu_123"),
            Err(UsernameError::InvalidCharacters)
        );
        assert_eq!(
            Username::new(" ayu123"),
            Err(UsernameError::InvalidCharacters)
        );
        assert_eq!(
            Username::new("ayü1234"),
            Err(UsernameError::InvalidCharacters)
        );
    }

    #[test]
    fn deserialization_validates() {
        let ok: Username = serde_json::from_str("\"ayu123\"").unwrap();
        assert_eq!(ok.as_str(), "ayu123");
        assert!(serde_json::from_str::<Username>("\"AYU123\"").is_err());
    }
}
