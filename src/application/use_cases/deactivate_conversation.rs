use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::error::ApplicationError;
use crate::application::ports::ConversationRepository;
use crate::domain::{ConversationId, UserId};

pub struct DeactivateConversationUseCase {
    conversation_repository: Arc<dyn ConversationRepository>,
}

impl DeactivateConversationUseCase {
    pub fn new(conversation_repository: Arc<dyn ConversationRepository>) -> Self {
        Self {
            conversation_repository,
        }
    }

    /// Soft delete. Deactivating twice is not an error; there is no way back.
    #[instrument(skip(self), fields(user_id = %user_id, conversation_id = %conversation_id))]
    pub async fn execute(
        &self,
        user_id: UserId,
        conversation_id: ConversationId,
    ) -> Result<(), ApplicationError> {
        let conversation = self
            .conversation_repository
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Conversation not found"))?;

        if !conversation.is_owned_by(user_id) {
            return Err(ApplicationError::validation(
                "You do not have permission to modify this conversation",
            ));
        }

        self.conversation_repository.delete(conversation_id).await?;

        info!("Conversation deactivated");
        Ok(())
    }
}
