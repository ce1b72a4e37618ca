//! Account Management Module
//!
//! Domain models and validators for accounts, the storage port with its
//! in-memory implementation, and the services that tie them to the access
//! policy.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{
    AccountChanges, AccountService, AccountStore, CreateAccountRequest, NewAccount,
    PasswordChangeRequest, RegistrationSettings, UpdateAccountRequest,
};
pub use domain::*;
pub use infrastructure::InMemoryAccountRepository;
