use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::dto::{CreateUserInput, UserView};
use crate::application::error::ApplicationError;
use crate::application::ports::{PasswordHasher, RepositoryError, UserRepository};
use crate::domain::{User, normalize_email};

const EMAIL_TAKEN: &str = "Email is already registered";

pub struct CreateUserUseCase {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl CreateUserUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
        }
    }

    #[instrument(skip(self, input), fields(email = %normalize_email(&input.email)))]
    pub async fn execute(&self, input: CreateUserInput) -> Result<UserView, ApplicationError> {
        if self.user_repository.exists_by_email(&input.email).await? {
            return Err(ApplicationError::conflict(EMAIL_TAKEN));
        }

        let password_hash = self.password_hasher.hash(&input.password).await?;
        let user = User::new(
            &input.email,
            input.name,
            password_hash,
            input.role.unwrap_or_default(),
        );

        // A concurrent registration can slip past the existence check; storage has the final say.
        match self.user_repository.create(&user).await {
            Ok(()) => {}
            Err(RepositoryError::ConstraintViolation(_)) => {
                return Err(ApplicationError::conflict(EMAIL_TAKEN));
            }
            Err(e) => return Err(e.into()),
        }

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(UserView::from(&user))
    }
}
