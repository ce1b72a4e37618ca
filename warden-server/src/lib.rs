//! # Warden Server
//!
//! HTTP front end for the account management core.
//!
//! ## Overview
//!
//! - **Accounts**: create, list, read, update and delete account records
//! - **Credentials**: self-service and admin password changes
//! - **Access control**: every request resolves a caller identity and passes
//!   the role-based access policy before anything is validated or stored
//!
//! ## Caller identity
//!
//! The bundled [`identity::HeaderIdentityResolver`] trusts two plain request
//! headers naming the caller's id and role. That is an identity *assertion*,
//! not authentication: anyone who can reach the server can claim to be an
//! admin. Deploy it only behind something that sets those headers itself, or
//! provide another [`identity::IdentityResolver`].

pub mod handlers;
pub mod identity;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::create_router;
