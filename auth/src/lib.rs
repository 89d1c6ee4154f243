//! Bearer-token authentication core
//!
//! Issues and validates access/refresh JWTs and orchestrates the
//! login/refresh handshake against a user store:
//! - Token issuing and validation with separate secrets per token class
//! - Password hashing (Argon2id)
//! - Login and refresh-token rotation
//!
//! User storage, HTTP transport and configuration loading live in the
//! services that depend on this crate; they plug in through [`UserProvider`]
//! and [`TokenConfig`].
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! ```
//!
//! ## Tokens
//! ```
//! use std::sync::Arc;
//!
//! use auth::{SystemClock, TokenIssuer, TokenService, UserIdentity};
//! use chrono::Duration;
//!
//! let tokens = TokenService::new(
//!     Arc::new(SystemClock),
//!     Duration::minutes(15),
//!     Duration::days(7),
//!     b"access_secret_at_least_32_bytes_long!",
//!     b"refresh_secret_at_least_32_bytes_long",
//! )
//! .unwrap();
//!
//! let user = UserIdentity::new(123, "alice", "alice@example.com");
//! let (access_token, _exp) = tokens.create_access_token(&user).unwrap();
//! let claims = tokens.parse_access_token(&access_token).unwrap();
//! assert_eq!(claims.id.as_u64(), 123);
//!
//! // an access token never passes as a refresh token
//! assert!(tokens.parse_refresh_token(&access_token).is_err());
//! ```

pub mod authenticator;
pub mod clock;
pub mod config;
pub mod errors;
pub mod jwt;
pub mod models;
pub mod password;
pub mod ports;

// Re-export commonly used items
pub use authenticator::AuthenticationService;
pub use clock::Clock;
pub use clock::SystemClock;
pub use config::TokenConfig;
pub use errors::AuthenticationError;
pub use jwt::AccessClaims;
pub use jwt::RefreshClaims;
pub use jwt::TokenConfigError;
pub use jwt::TokenError;
pub use jwt::TokenService;
pub use models::Credentials;
pub use models::TokenPair;
pub use models::UserId;
pub use models::UserIdentity;
pub use models::UserRecord;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use ports::TokenIssuer;
pub use ports::UserProvider;
pub use ports::UserProviderError;
