use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::application::dto::{AuthView, LoginInput, UserView};
use crate::application::error::ApplicationError;
use crate::application::ports::{PasswordHasher, TokenService, UserRepository};

/// Same text for unknown email, inactive account and wrong password.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthenticateUserUseCase {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_service: Arc<dyn TokenService>,
}

impl AuthenticateUserUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_service: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_service,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn execute(&self, input: LoginInput) -> Result<AuthView, ApplicationError> {
        let Some(user) = self.user_repository.find_by_email(&input.email).await? else {
            warn!("Login attempt for unknown email");
            return Err(ApplicationError::unauthorized(INVALID_CREDENTIALS));
        };

        if !user.is_active {
            warn!(user_id = %user.id, "Login attempt for inactive user");
            return Err(ApplicationError::unauthorized(INVALID_CREDENTIALS));
        }

        let password_matches = self
            .password_hasher
            .verify(&input.password, &user.password_hash)
            .await?;
        if !password_matches {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(ApplicationError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.token_service.issue(&user)?;

        info!(user_id = %user.id, "User authenticated");
        Ok(AuthView {
            user: UserView::from(&user),
            token,
        })
    }
}
