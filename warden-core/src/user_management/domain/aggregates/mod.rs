mod account;

pub use account::{
    Account, AccountId, AccountPatch, AccountView, DuplicateField,
    find_duplicate,
};
