//! Authentication error types.

use campus_core::error::CampusError;
use thiserror::Error;

/// Message shared by every login failure that must not reveal which
/// step failed.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The tenant code did not resolve. Kept distinct for logging only;
    /// callers see the same message as [`AuthError::InvalidCredentials`].
    #[error("invalid tenant")]
    InvalidTenant,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for CampusError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidTenant => {
                CampusError::AuthenticationFailed {
                    reason: INVALID_CREDENTIALS.into(),
                }
            }
            AuthError::TokenExpired | AuthError::TokenInvalid(_) => {
                CampusError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => CampusError::Crypto(msg),
        }
    }
}
