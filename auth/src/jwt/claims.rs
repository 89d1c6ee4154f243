use serde::Deserialize;
use serde::Serialize;

use crate::models::UserId;
use crate::models::UserIdentity;

/// Claims embedded in an access token.
///
/// Serialized as `{"name": .., "id": .., "exp": ..}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Display name of the subject at issuance
    pub name: String,

    /// Subject identifier
    pub id: UserId,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccessClaims {
    pub fn for_user(user: &UserIdentity, exp: i64) -> Self {
        Self {
            name: user.display_name.clone(),
            id: user.id,
            exp,
        }
    }
}

/// Claims embedded in a refresh token.
///
/// Carries no display name, only what a refresh exchange needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    pub id: UserId,
    pub exp: i64,
}

impl RefreshClaims {
    pub fn for_user(user: &UserIdentity, exp: i64) -> Self {
        Self { id: user.id, exp }
    }
}

/// Expiry check shared by every claims type.
pub trait Expiring {
    fn expires_at(&self) -> i64;

    /// A token expiring exactly at `now` is already expired.
    fn is_expired(&self, now: i64) -> bool {
        self.expires_at() <= now
    }
}

impl Expiring for AccessClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }
}

impl Expiring for RefreshClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }
}
