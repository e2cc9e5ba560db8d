use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::error::ApplicationError;
use crate::application::ports::UserRepository;
use crate::domain::UserId;

pub struct DeactivateUserUseCase {
    user_repository: Arc<dyn UserRepository>,
}

impl DeactivateUserUseCase {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn execute(&self, user_id: UserId) -> Result<(), ApplicationError> {
        if !self.user_repository.delete(user_id).await? {
            return Err(ApplicationError::not_found("User not found"));
        }

        info!("User deactivated");
        Ok(())
    }
}
