use std::sync::Arc;

use tracing::instrument;

use crate::application::dto::UserList;
use crate::application::error::ApplicationError;
use crate::application::pagination::PageRequest;
use crate::application::ports::UserRepository;

/// Role checks happen at the route; this use case trusts its caller.
pub struct GetUsersUseCase {
    user_repository: Arc<dyn UserRepository>,
}

impl GetUsersUseCase {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, page: PageRequest) -> Result<UserList, ApplicationError> {
        let users = self.user_repository.find_all(page).await?;
        Ok(UserList::from(users))
    }
}
