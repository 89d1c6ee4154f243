use thiserror::Error;

use crate::jwt::TokenError;

/// Authentication operation errors.
///
/// Each variant is a kind callers branch on; the wrapped text keeps the
/// underlying cause for logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid authorization token: {0}")]
    InvalidAuthToken(#[from] TokenError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}
