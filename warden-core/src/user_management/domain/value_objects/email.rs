use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dot-atom local part, `@`, and at least two LDH domain labels.
static EMAIL_SYNTAX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$"#,
    )
    .expect("email syntax regex is valid")
});

/// Email address value object restricted to a single accepted domain.
///
/// Validation runs in two stages so callers can tell the failures apart:
/// syntax first ([`EmailError::Malformed`]), then the domain
/// ([`EmailError::WrongDomain`]). The domain part is stored lowercased; the
/// local part keeps its original casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub const REQUIRED_DOMAIN: &'static str = "gmail.com";
    const MAX_LENGTH: usize = 254;
    const MAX_LOCAL_LENGTH: usize = 64;

    pub fn new(email: impl AsRef<str>) -> Result<Self, EmailError> {
        let email = email.as_ref();

        if email.len() > Self::MAX_LENGTH || !EMAIL_SYNTAX.is_match(email) {
            return Err(EmailError::Malformed);
        }

        // The regex admits exactly one '@'
        let Some((local, domain)) = email.rsplit_once('@') else {
            return Err(EmailError::Malformed);
        };
        if local.len() > Self::MAX_LOCAL_LENGTH {
            return Err(EmailError::Malformed);
        }

        if !domain.eq_ignore_ascii_case(Self::REQUIRED_DOMAIN) {
            return Err(EmailError::WrongDomain {
                domain: domain.to_ascii_lowercase(),
            });
        }

        Ok(Self(format!("{}@{}", local, Self::REQUIRED_DOMAIN)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison used by the uniqueness scan.
    pub fn same_address(&self, other: &EmailAddress) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    #[error("email address is not syntactically valid")]
    Malformed,

    #[error("email domain must be gmail.com (got {domain})")]
    WrongDomain { domain: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_gmail_addresses() {
        assert_eq!(EmailAddress::new("ayu@gmail.com").unwrap().as_str(), "ayu@gmail.com");
        assert!(EmailAddress::new("first.last+tag@gmail.com").is_ok());
        assert!(EmailAddress::new("o'brien@gmail.com").is_ok());
    }

    #[test]
    fn domain_is_case_insensitive_and_normalized() {
        let email = EmailAddress::new("Ayu@GMAIL.Com").unwrap();
        assert_eq!(email.as_str(), "Ayu@gmail.com");
    }

    #[test]
    fn malformed_addresses() {
        for raw in [
            "salah-format",
            "",
            "@gmail.com",
            "ayu@",
            "ayu@@gmail.com",
            "ayu @gmail.com",
            ".ayu@gmail.com",
            "ayu.@gmail.com",
            "ay..u@gmail.com",
            "ayu@gmail",
            "ayu@-gmail.com",
            "ayu@gmail..com",
        ] {
            assert_eq!(EmailAddress::new(raw), Err(EmailError::Malformed), "{raw}");
        }
    }

    #[test]
    fn overlong_local_part_is_malformed() {
        let raw = format!("{}@gmail.com", "a".repeat(65));
        assert_eq!(EmailAddress::new(raw), Err(EmailError::Malformed));
    }

    #[test]
    fn wrong_domain_is_distinguished() {
        assert_eq!(
            EmailAddress::new("ayu@yahoo.com"),
            Err(EmailError::WrongDomain {
                domain: "yahoo.com".to_string()
            })
        );
        assert!(matches!(
            EmailAddress::new("ayu@mail.gmail.com"),
            Err(EmailError::WrongDomain { .. })
        ));
        assert!(matches!(
            EmailAddress::new("ayu@gmail.co"),
            Err(EmailError::WrongDomain { .. })
        ));
    }

    #[test]
    fn same_address_ignores_case() {
        let a = EmailAddress::new("Ayu@gmail.com").unwrap();
        let b = EmailAddress::new("ayu@GMAIL.com").unwrap();
        let c = EmailAddress::new("budi@gmail.com").unwrap();
        assert!(a.same_address(&b));
        assert!(!a.same_address(&c));
    }
}
