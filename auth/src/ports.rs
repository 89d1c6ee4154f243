use async_trait::async_trait;
use thiserror::Error;

use crate::jwt::AccessClaims;
use crate::jwt::RefreshClaims;
use crate::jwt::TokenError;
use crate::models::UserId;
use crate::models::UserIdentity;
use crate::models::UserRecord;

/// Error returned by a [`UserProvider`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserProviderError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User store unavailable: {0}")]
    Unavailable(String),
}

/// User lookups needed by the authentication flows.
///
/// Implemented outside this crate by whatever owns user storage.
#[async_trait]
pub trait UserProvider: Send + Sync + 'static {
    /// Retrieve a user and its password digest by email.
    ///
    /// # Errors
    /// * `NotFound` - No user with this email
    /// * `Unavailable` - Underlying storage failed
    async fn get_user_by_email(&self, email: &str) -> Result<UserRecord, UserProviderError>;

    /// Retrieve a user by identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist (deleted or never created)
    /// * `Unavailable` - Underlying storage failed
    async fn get_by_id(&self, id: UserId) -> Result<UserIdentity, UserProviderError>;
}

/// Token operations needed by the authentication flows.
pub trait TokenIssuer: Send + Sync + 'static {
    /// Mint an access token and return it with its expiry (Unix seconds).
    fn create_access_token(&self, user: &UserIdentity) -> Result<(String, i64), TokenError>;

    /// Mint a refresh token.
    fn create_refresh_token(&self, user: &UserIdentity) -> Result<String, TokenError>;

    /// Verify and decode an access token.
    fn parse_access_token(&self, token: &str) -> Result<AccessClaims, TokenError>;

    /// Verify and decode a refresh token.
    fn parse_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError>;
}
