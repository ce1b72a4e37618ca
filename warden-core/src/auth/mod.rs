//! Caller identity, access policy and credential handling.

pub mod access;
pub mod crypto;
pub mod identity;
pub mod policy;

pub use access::{AccessDenied, AccessGrant, AccountOperation, DenialReason, authorize};
pub use crypto::{Argon2Settings, AuthCrypto, AuthCryptoError};
pub use identity::{AuthenticationError, CallerIdentity};
pub use policy::{
    PasswordPolicy, PasswordPolicyCheck, PasswordPolicyError, PasswordPolicyRule,
    ValidatedPassword,
};
