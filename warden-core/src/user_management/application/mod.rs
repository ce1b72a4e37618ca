//! Application services for account administration.

mod account_service;
mod account_store;

pub use account_service::{
    AccountService, CreateAccountRequest, PasswordChangeRequest, RegistrationSettings,
    UpdateAccountRequest,
};
pub use account_store::{AccountChanges, AccountStore, NewAccount};
