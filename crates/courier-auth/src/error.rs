//! Authentication error types.

use courier_core::error::CourierError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing API key")]
    MissingApiKey,

    #[error("invalid API key")]
    InvalidApiKey,

    #[error("API key has been revoked")]
    ApiKeyRevoked,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for CourierError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingApiKey
            | AuthError::InvalidApiKey
            | AuthError::ApiKeyRevoked
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => CourierError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => CourierError::Crypto(msg),
        }
    }
}
