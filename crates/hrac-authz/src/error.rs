//! Authorization error types.

use hrac_core::error::HracError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthzError> for HracError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::TokenExpired | AuthzError::TokenInvalid(_) => {
                HracError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AuthzError::Crypto(msg) => HracError::Internal(msg),
        }
    }
}
