use std::sync::Arc;

use async_trait::async_trait;
use auth::UserId;
use auth::UserIdentity;
use auth::UserProvider;
use auth::UserProviderError;
use auth::UserRecord;
use chrono::Utc;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
/// Also serves as the user provider for the authentication flows.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.password_hasher.hash(command.password.as_str())?;

        let user = NewUser {
            name: command.name,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn get_user(&self, id: UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<UR> UserProvider for UserService<UR>
where
    UR: UserRepository,
{
    async fn get_user_by_email(&self, email: &str) -> Result<UserRecord, UserProviderError> {
        self.repository
            .find_by_email(email)
            .await
            .map_err(into_provider_error)?
            .map(UserRecord::from)
            .ok_or_else(|| UserProviderError::NotFound(email.to_string()))
    }

    async fn get_by_id(&self, id: UserId) -> Result<UserIdentity, UserProviderError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(into_provider_error)?
            .map(|user| user.identity())
            .ok_or_else(|| UserProviderError::NotFound(id.to_string()))
    }
}

fn into_provider_error(err: UserError) -> UserProviderError {
    match err {
        UserError::NotFound(who) => UserProviderError::NotFound(who),
        other => UserProviderError::Unavailable(other.to_string()),
    }
}
