use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Password composition policy applied to every new credential.
///
/// Rules are evaluated in a fixed order and every unmet rule is reported, so
/// the first entry of [`PasswordPolicyError::failures`] is always the first
/// failing rule in this order:
///
/// 1. length between `min_length` and `max_length` characters (inclusive)
/// 2. only ASCII letters, ASCII digits and the configured special characters
/// 3. at least one lowercase letter
/// 4. at least one uppercase letter
/// 5. at least one digit
/// 6. at least one special character
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum length in characters.
    pub min_length: u16,
    /// Maximum length in characters.
    pub max_length: u16,
    /// The only non-alphanumeric characters a password may contain.
    pub special_characters: String,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl PasswordPolicy {
    pub const DEFAULT_MIN_LENGTH: u16 = 8;
    pub const DEFAULT_MAX_LENGTH: u16 = 20;
    pub const DEFAULT_SPECIAL_CHARACTERS: &'static str = "!@";

    /// 8-20 characters, letters/digits plus `!` and `@`, every class required.
    pub fn standard() -> Self {
        Self {
            min_length: Self::DEFAULT_MIN_LENGTH,
            max_length: Self::DEFAULT_MAX_LENGTH,
            special_characters: Self::DEFAULT_SPECIAL_CHARACTERS.to_string(),
        }
    }

    fn is_special(&self, c: char) -> bool {
        self.special_characters.contains(c)
    }

    /// Evaluate a password against the policy returning failed rule labels.
    pub fn check(&self, password: &str) -> PasswordPolicyCheck {
        let mut failures = Vec::new();

        let length = password.chars().count();
        if length < self.min_length as usize || length > self.max_length as usize
        {
            failures.push(PasswordPolicyRule::Length {
                min: self.min_length,
                max: self.max_length,
            });
        }
        if !password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || self.is_special(c))
        {
            failures.push(PasswordPolicyRule::AllowedCharacters);
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            failures.push(PasswordPolicyRule::Lowercase);
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            failures.push(PasswordPolicyRule::Uppercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            failures.push(PasswordPolicyRule::Number);
        }
        if !password.chars().any(|c| self.is_special(c)) {
            failures.push(PasswordPolicyRule::Special);
        }

        PasswordPolicyCheck { failures }
    }

    /// Validate a raw password, producing a value that can be hashed.
    pub fn validate(
        &self,
        password: &str,
    ) -> Result<ValidatedPassword, PasswordPolicyError> {
        let PasswordPolicyCheck { failures } = self.check(password);
        if failures.is_empty() {
            Ok(ValidatedPassword(Zeroizing::new(password.to_string())))
        } else {
            Err(PasswordPolicyError { failures })
        }
    }
}

/// A single composition rule of the [`PasswordPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordPolicyRule {
    Length { min: u16, max: u16 },
    AllowedCharacters,
    Lowercase,
    Uppercase,
    Number,
    Special,
}

impl fmt::Display for PasswordPolicyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { min, max } => {
                write!(f, "length between {} and {} characters", min, max)
            }
            Self::AllowedCharacters => {
                write!(f, "only letters, digits, and ! or @")
            }
            Self::Lowercase => write!(f, "at least one lowercase letter"),
            Self::Uppercase => write!(f, "at least one uppercase letter"),
            Self::Number => write!(f, "at least one digit"),
            Self::Special => write!(f, "at least one of ! or @"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicyCheck {
    pub failures: Vec<PasswordPolicyRule>,
}

impl PasswordPolicyCheck {
    pub fn is_satisfied(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Rejection carrying every unmet rule in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password does not meet the required policy: {}", describe(.failures))]
pub struct PasswordPolicyError {
    pub failures: Vec<PasswordPolicyRule>,
}

impl PasswordPolicyError {
    /// The first failing rule in evaluation order.
    pub fn first(&self) -> Option<&PasswordPolicyRule> {
        self.failures.first()
    }
}

fn describe(failures: &[PasswordPolicyRule]) -> String {
    failures
        .iter()
        .map(|rule| rule.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A raw password that has passed the [`PasswordPolicy`].
///
/// Only obtainable through [`PasswordPolicy::validate`], so any API taking
/// one can rely on the policy having run. The buffer is zeroed on drop.
#[derive(Clone)]
pub struct ValidatedPassword(Zeroizing<String>);

impl ValidatedPassword {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ValidatedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidatedPassword(<redacted>)")
    }
}
