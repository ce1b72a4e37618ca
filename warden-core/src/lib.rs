//! # Warden Core
//!
//! Account management core: field validators, the password policy, an
//! in-memory account store and the role-based access policy that guards it.
//!
//! ## Overview
//!
//! - **Validation**: usernames, `gmail.com` email addresses and password
//!   composition rules, each reporting which rule failed
//! - **Credentials**: Argon2id hashing with a server-side pepper; plaintext
//!   never reaches the store
//! - **Storage**: [`AccountRepository`] port with an in-memory
//!   implementation whose uniqueness checks are atomic with each write
//! - **Access**: two roles, `admin` and `staff`, and a pure [`authorize`]
//!   decision per operation
//!
//! ## Architecture
//!
//! - [`auth`]: caller identity, access policy, password policy and hashing
//! - [`user_management`]: domain types, repositories and services
//! - [`error`]: the [`AccountError`] taxonomy shared by every operation
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use warden_core::{
//!     AccountService, AccountStore, AuthCrypto, CallerIdentity,
//!     CreateAccountRequest, InMemoryAccountRepository, PasswordPolicy,
//!     RegistrationSettings,
//! };
//!
//! async fn bootstrap() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = AccountStore::new(
//!         Arc::new(InMemoryAccountRepository::new()),
//!         Arc::new(AuthCrypto::new("pepper")?),
//!         PasswordPolicy::standard(),
//!     );
//!     let service = AccountService::new(store, RegistrationSettings::default());
//!
//!     let admin = CallerIdentity::from_assertion(Some("admin-1"), Some("admin"))?;
//!     let request: CreateAccountRequest = serde_json::from_str(
//!         r#"{"username":"ayu123","email":"ayu@gmail.com","role":"staff","password":"Abcdef1!"}"#,
//!     )?;
//!     let view = service.create_account(Some(&admin), request).await?;
//!     println!("created {}", view.id);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod user_management;

pub use auth::{
    AccessDenied, AccessGrant, AccountOperation, Argon2Settings, AuthCrypto,
    AuthCryptoError, AuthenticationError, CallerIdentity, DenialReason,
    PasswordPolicy, PasswordPolicyError, PasswordPolicyRule, ValidatedPassword,
    authorize,
};
pub use error::{AccountError, Result};
pub use user_management::{
    Account, AccountChanges, AccountId, AccountPatch, AccountRepository,
    AccountRepositoryError, AccountRole, AccountService, AccountStore, AccountView,
    CreateAccountRequest, DuplicateField, EmailAddress, EmailError,
    InMemoryAccountRepository, NewAccount, PasswordChangeRequest,
    RegistrationSettings, UpdateAccountRequest, Username, UsernameError,
    ValidationError,
};
