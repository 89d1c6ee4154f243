use std::sync::Arc;

use chrono::Duration;

use super::claims::AccessClaims;
use super::claims::Expiring;
use super::claims::RefreshClaims;
use super::errors::TokenConfigError;
use super::errors::TokenError;
use super::handler::JwtHandler;
use crate::clock::Clock;
use crate::config::TokenConfig;
use crate::models::UserIdentity;
use crate::ports::TokenIssuer;

/// Issues and validates access and refresh tokens.
///
/// Each token class has its own secret and lifetime, so an access token
/// never verifies as a refresh token and vice versa. Immutable after
/// construction and safe to share between tasks.
pub struct TokenService {
    clock: Arc<dyn Clock>,
    access_duration: Duration,
    refresh_duration: Duration,
    access: JwtHandler,
    refresh: JwtHandler,
}

impl TokenService {
    /// Create a token service.
    ///
    /// # Arguments
    /// * `clock` - Time source for `exp` on issue and on parse
    /// * `access_duration` - Lifetime of access tokens
    /// * `refresh_duration` - Lifetime of refresh tokens
    /// * `access_secret` - HMAC secret for access tokens
    /// * `refresh_secret` - HMAC secret for refresh tokens
    ///
    /// # Errors
    /// * `EmptySecret` - A secret is empty
    /// * `SharedSecret` - Both secrets are identical
    /// * `NonPositiveDuration` - A lifetime is zero or negative
    pub fn new(
        clock: Arc<dyn Clock>,
        access_duration: Duration,
        refresh_duration: Duration,
        access_secret: &[u8],
        refresh_secret: &[u8],
    ) -> Result<Self, TokenConfigError> {
        if access_secret.is_empty() {
            return Err(TokenConfigError::EmptySecret("Access"));
        }
        if refresh_secret.is_empty() {
            return Err(TokenConfigError::EmptySecret("Refresh"));
        }
        if access_secret == refresh_secret {
            return Err(TokenConfigError::SharedSecret);
        }
        if access_duration <= Duration::zero() {
            return Err(TokenConfigError::NonPositiveDuration("Access"));
        }
        if refresh_duration <= Duration::zero() {
            return Err(TokenConfigError::NonPositiveDuration("Refresh"));
        }

        Ok(Self {
            clock,
            access_duration,
            refresh_duration,
            access: JwtHandler::new(access_secret),
            refresh: JwtHandler::new(refresh_secret),
        })
    }

    /// Create a token service from loaded configuration.
    ///
    /// # Errors
    /// * `DurationOutOfRange` - A lifetime in seconds is too large to represent
    /// * Anything [`TokenService::new`] rejects
    pub fn from_config(
        config: &TokenConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenConfigError> {
        let access_duration = Duration::try_seconds(config.access_token_ttl_secs)
            .ok_or(TokenConfigError::DurationOutOfRange("Access"))?;
        let refresh_duration = Duration::try_seconds(config.refresh_token_ttl_secs)
            .ok_or(TokenConfigError::DurationOutOfRange("Refresh"))?;

        Self::new(
            clock,
            access_duration,
            refresh_duration,
            config.access_secret.as_bytes(),
            config.refresh_secret.as_bytes(),
        )
    }

    fn now(&self) -> i64 {
        self.clock.now().timestamp()
    }

    /// `now + lifetime` as a unix timestamp, failing instead of overflowing.
    fn expiry_after(&self, lifetime: Duration) -> Result<i64, TokenError> {
        self.clock
            .now()
            .checked_add_signed(lifetime)
            .map(|at| at.timestamp())
            .ok_or_else(|| {
                TokenError::EncodingFailed(format!(
                    "expiry {}s from now is out of range",
                    lifetime.num_seconds()
                ))
            })
    }

    fn check_expiry<C: Expiring>(&self, claims: C) -> Result<C, TokenError> {
        if claims.is_expired(self.now()) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

impl TokenIssuer for TokenService {
    fn create_access_token(&self, user: &UserIdentity) -> Result<(String, i64), TokenError> {
        let expires_at = self.expiry_after(self.access_duration)?;
        let claims = AccessClaims::for_user(user, expires_at);

        let token = self.access.encode(&claims)?;
        tracing::debug!(user_id = %user.id, exp = expires_at, "Access token issued");

        Ok((token, expires_at))
    }

    fn create_refresh_token(&self, user: &UserIdentity) -> Result<String, TokenError> {
        let expires_at = self.expiry_after(self.refresh_duration)?;
        let claims = RefreshClaims::for_user(user, expires_at);

        let token = self.refresh.encode(&claims)?;
        tracing::debug!(user_id = %user.id, exp = expires_at, "Refresh token issued");

        Ok(token)
    }

    fn parse_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.access
            .decode::<AccessClaims>(token)
            .and_then(|claims| self.check_expiry(claims))
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                e
            })
    }

    fn parse_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.refresh
            .decode::<RefreshClaims>(token)
            .and_then(|claims| self.check_expiry(claims))
            .map_err(|e| {
                tracing::debug!(error = %e, "Refresh token rejected");
                e
            })
    }
}
