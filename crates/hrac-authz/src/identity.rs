//! Authenticated caller identity.

use uuid::Uuid;

use crate::error::AuthzError;
use crate::token::ValidatedClaims;

/// The authenticated principal attached to a request.
///
/// Built only from verified token claims, so holding one proves the
/// caller authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
}

impl Identity {
    pub fn from_claims(claims: &ValidatedClaims) -> Result<Self, AuthzError> {
        let user_id = Uuid::parse_str(&claims.0.sub)
            .map_err(|e| AuthzError::TokenInvalid(format!("sub is not a UUID: {e}")))?;
        Ok(Self { user_id })
    }
}
