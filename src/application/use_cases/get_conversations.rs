use std::sync::Arc;

use tracing::instrument;

use crate::application::dto::ConversationList;
use crate::application::error::ApplicationError;
use crate::application::pagination::PageRequest;
use crate::application::ports::ConversationRepository;
use crate::domain::UserId;

pub struct GetConversationsUseCase {
    conversation_repository: Arc<dyn ConversationRepository>,
}

impl GetConversationsUseCase {
    pub fn new(conversation_repository: Arc<dyn ConversationRepository>) -> Self {
        Self {
            conversation_repository,
        }
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn execute(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<ConversationList, ApplicationError> {
        let conversations = self
            .conversation_repository
            .find_by_user_id(user_id, page)
            .await?;
        Ok(ConversationList::from(conversations))
    }
}
