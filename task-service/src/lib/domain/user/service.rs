use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for registration and login.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())
            .map_err(|e| UserError::HashingFailed(e.to_string()))?;

        let user = NewUser {
            username: command.username,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AccessToken, UserError> {
        let Ok(username) = Username::new(command.username) else {
            tracing::warn!("Login rejected: malformed username");
            self.authenticator.simulate_verification(&command.password);
            return Err(UserError::InvalidCredentials);
        };

        let Some(user) = self.repository.find_by_username(&username).await? else {
            tracing::warn!(username = %username, "Login rejected: unknown username");
            self.authenticator.simulate_verification(&command.password);
            return Err(UserError::InvalidCredentials);
        };

        let result = self
            .authenticator
            .authenticate(&command.password, &user.password_hash, user.id)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
                    UserError::InvalidCredentials
                }
                AuthenticationError::PasswordError(err) => {
                    tracing::error!(user_id = %user.id, error = %err, "Stored password hash is unusable");
                    UserError::HashingFailed(err.to_string())
                }
                AuthenticationError::JwtError(err) => {
                    tracing::error!(user_id = %user.id, error = %err, "Token generation failed");
                    UserError::TokenIssuanceFailed(err.to_string())
                }
            })?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AccessToken {
            token: result.access_token,
            expires_at: result.expires_at,
        })
    }
}
