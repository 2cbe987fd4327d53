// Authentication service - business logic layer

use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::{
    error::AuthError, password::PasswordService, repository::UserRepository, token::TokenService,
};
use crate::store::DocumentId;

/// Authentication service coordinating signup and login
pub struct AuthService {
    user_repo: UserRepository,
    token_service: Arc<TokenService>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(user_repo: UserRepository, token_service: Arc<TokenService>) -> Self {
        Self {
            user_repo,
            token_service,
        }
    }

    /// Register a new user, returning the new user's id
    pub async fn signup(&self, email: &str, password: &str) -> Result<DocumentId, AuthError> {
        if self.user_repo.email_exists(email).await? {
            debug!("Signup rejected, email already registered: {}", email);
            return Err(AuthError::EmailAlreadyExists);
        }

        let password = password.to_owned();
        let password_hash =
            run_blocking(move || PasswordService::hash_password(&password)).await?;
        let user_id = self.user_repo.create_user(email, &password_hash).await?;

        info!("Created user {} with id {}", email, user_id);
        Ok(user_id)
    }

    /// Check credentials and issue a token
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = password.to_owned();
        let password_hash = user.password_hash.clone();
        let verified =
            run_blocking(move || PasswordService::verify_password(&password, &password_hash))
                .await?;
        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.token_service.issue(&user.email)?;
        debug!("Issued token for {}", user.email);
        Ok(token)
    }
}

/// Runs CPU-bound password work on the blocking pool, off the async workers
async fn run_blocking<T, F>(work: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthError::PasswordHashError(e.to_string()))?
}
