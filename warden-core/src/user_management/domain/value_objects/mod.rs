// Account domain value objects
// These types are immutable and validated upon creation, so holding one is
// proof the raw input passed the corresponding field rule.

mod account_role;
mod email;
mod username;

pub use account_role::{AccountRole, UnknownRole};
pub use email::{EmailAddress, EmailError};
pub use username::{Username, UsernameError};
