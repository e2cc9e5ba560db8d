use std::sync::Arc;

use tracing::instrument;

use crate::application::dto::MessageList;
use crate::application::error::ApplicationError;
use crate::application::pagination::PageRequest;
use crate::application::ports::{ConversationRepository, MessageRepository};
use crate::domain::{ConversationId, UserId};

pub struct GetMessagesUseCase {
    message_repository: Arc<dyn MessageRepository>,
    conversation_repository: Arc<dyn ConversationRepository>,
}

impl GetMessagesUseCase {
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        conversation_repository: Arc<dyn ConversationRepository>,
    ) -> Self {
        Self {
            message_repository,
            conversation_repository,
        }
    }

    /// History of an inactive conversation stays readable by its owner.
    #[instrument(skip(self), fields(user_id = %user_id, conversation_id = %conversation_id))]
    pub async fn execute(
        &self,
        user_id: UserId,
        conversation_id: ConversationId,
        page: PageRequest,
    ) -> Result<MessageList, ApplicationError> {
        let conversation = self
            .conversation_repository
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Conversation not found"))?;

        if !conversation.is_owned_by(user_id) {
            return Err(ApplicationError::validation(
                "You do not have permission to view this conversation",
            ));
        }

        let messages = self
            .message_repository
            .find_by_conversation_id(conversation_id, page)
            .await?;
        Ok(MessageList::from(messages))
    }
}
