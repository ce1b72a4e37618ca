//! Caller identity resolution.
//!
//! Handlers never look at transport credentials themselves; they ask the
//! configured [`IdentityResolver`] through the [`Caller`] and [`MaybeCaller`]
//! extractors.

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap,
        header::{HeaderName, InvalidHeaderName},
        request::Parts,
    },
};
use warden_core::{AccountError, AuthenticationError, CallerIdentity};

use crate::infra::{app_state::AppState, errors::AppError};

/// Turns request headers into an asserted caller identity.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Result<CallerIdentity, AuthenticationError>;
}

/// Reads the caller id and role from two plain request headers.
///
/// This is NOT authentication. Nothing ties the header values to a secret,
/// so any client can claim any id or role. It exists for trusted
/// deployments where an upstream proxy sets the headers, and for tests.
#[derive(Debug, Clone)]
pub struct HeaderIdentityResolver {
    id_header: HeaderName,
    role_header: HeaderName,
}

impl HeaderIdentityResolver {
    pub fn new(id_header: &str, role_header: &str) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            id_header: HeaderName::from_bytes(id_header.as_bytes())?,
            role_header: HeaderName::from_bytes(role_header.as_bytes())?,
        })
    }
}

impl IdentityResolver for HeaderIdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Result<CallerIdentity, AuthenticationError> {
        let value = |name: &HeaderName| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
        };
        CallerIdentity::from_assertion(value(&self.id_header), value(&self.role_header))
    }
}

/// A caller whose identity resolved successfully.
#[derive(Debug, Clone)]
pub struct Caller(pub CallerIdentity);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .identity
            .resolve(&parts.headers)
            .map(Caller)
            .map_err(|err| AccountError::from(err).into())
    }
}

/// A caller that may be anonymous. Garbled assertions are still rejected.
#[derive(Debug, Clone)]
pub struct MaybeCaller(pub Option<CallerIdentity>);

impl FromRequestParts<AppState> for MaybeCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AuthenticationError::optional(state.identity.resolve(&parts.headers))
            .map(MaybeCaller)
            .map_err(|err| AccountError::from(err).into())
    }
}
