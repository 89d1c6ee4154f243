use std::sync::Arc;

use crate::errors::AuthenticationError;
use crate::models::Credentials;
use crate::models::TokenPair;
use crate::models::UserIdentity;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::ports::TokenIssuer;
use crate::ports::UserProvider;
use crate::ports::UserProviderError;

/// Well-formed Argon2id digest with default cost that no password matches.
const UNKNOWN_USER_DIGEST: &str = "$argon2id$v=19$m=19456,t=2,p=1$bG9naW4tdGltaW5nLXBhZA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Authentication coordinator for login and refresh.
///
/// Combines a user provider, a token issuer and password verification into
/// two linear pipelines. Holds no mutable state; every call is independent.
pub struct AuthenticationService<P, T>
where
    P: UserProvider,
    T: TokenIssuer,
{
    users: Arc<P>,
    tokens: Arc<T>,
    password_hasher: PasswordHasher,
}

impl<P, T> AuthenticationService<P, T>
where
    P: UserProvider,
    T: TokenIssuer,
{
    /// Create a new authentication service.
    ///
    /// # Arguments
    /// * `users` - User lookups by email and id
    /// * `tokens` - Token issuer/validator
    pub fn new(users: Arc<P>, tokens: Arc<T>) -> Self {
        Self {
            users,
            tokens,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Verify credentials and issue a fresh token pair.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `InvalidPassword` - Password does not match the stored digest
    /// * `Unexpected` - Storage, digest, or signing failure
    pub async fn login(&self, credentials: Credentials) -> Result<TokenPair, AuthenticationError> {
        let record = match self.users.get_user_by_email(&credentials.email).await {
            Ok(record) => record,
            Err(UserProviderError::NotFound(who)) => {
                // Pay the same Argon2 cost as a real account
                let _ = self
                    .password_hasher
                    .verify(&credentials.password, UNKNOWN_USER_DIGEST);
                return Err(AuthenticationError::UserNotFound(who));
            }
            Err(e) => return Err(provider_error("get user by email", e)),
        };

        self.password_hasher
            .verify(&credentials.password, &record.password_digest)
            .map_err(|e| match e {
                PasswordError::Mismatch => AuthenticationError::InvalidPassword,
                other => {
                    tracing::error!(
                        user_id = %record.identity.id,
                        error = %other,
                        "Stored password digest unusable"
                    );
                    AuthenticationError::Unexpected(format!("verify password: {}", other))
                }
            })?;

        let pair = self.issue_pair(&record.identity)?;
        tracing::info!(user_id = %record.identity.id, "User logged in");

        Ok(pair)
    }

    /// Exchange a refresh token for a brand-new token pair.
    ///
    /// The user is re-fetched so deleted accounts stop refreshing. The old
    /// refresh token is not invalidated and stays usable until it expires.
    ///
    /// # Errors
    /// * `InvalidAuthToken` - Token failed algorithm, signature, or expiry checks
    /// * `UserNotFound` - Token subject no longer exists
    /// * `Unexpected` - Storage or signing failure
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthenticationError> {
        let claims = self.tokens.parse_refresh_token(refresh_token)?;

        let user = self
            .users
            .get_by_id(claims.id)
            .await
            .map_err(|e| provider_error("get user by id", e))?;

        let pair = self.issue_pair(&user)?;
        tracing::info!(user_id = %user.id, "Token pair refreshed");

        Ok(pair)
    }

    fn issue_pair(&self, user: &UserIdentity) -> Result<TokenPair, AuthenticationError> {
        let (access_token, access_expires_at) = self
            .tokens
            .create_access_token(user)
            .map_err(|e| AuthenticationError::Unexpected(format!("create access token: {}", e)))?;

        let refresh_token = self
            .tokens
            .create_refresh_token(user)
            .map_err(|e| AuthenticationError::Unexpected(format!("create refresh token: {}", e)))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
        })
    }
}

fn provider_error(context: &str, err: UserProviderError) -> AuthenticationError {
    match err {
        UserProviderError::NotFound(who) => AuthenticationError::UserNotFound(who),
        UserProviderError::Unavailable(cause) => {
            AuthenticationError::Unexpected(format!("{}: {}", context, cause))
        }
    }
}
