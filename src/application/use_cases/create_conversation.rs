use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::dto::{ConversationView, CreateConversationInput};
use crate::application::error::ApplicationError;
use crate::application::ports::{ConversationRepository, UserRepository};
use crate::domain::{Conversation, UserId};

pub struct CreateConversationUseCase {
    conversation_repository: Arc<dyn ConversationRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl CreateConversationUseCase {
    pub fn new(
        conversation_repository: Arc<dyn ConversationRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            conversation_repository,
            user_repository,
        }
    }

    #[instrument(skip(self, input), fields(user_id = %user_id))]
    pub async fn execute(
        &self,
        user_id: UserId,
        input: CreateConversationInput,
    ) -> Result<ConversationView, ApplicationError> {
        if self.user_repository.find_by_id(user_id).await?.is_none() {
            return Err(ApplicationError::not_found("User not found"));
        }

        let conversation = Conversation::new(user_id, input.title, input.description);
        self.conversation_repository.create(&conversation).await?;

        info!(conversation_id = %conversation.id, "Conversation created");
        Ok(ConversationView::from(&conversation))
    }
}
