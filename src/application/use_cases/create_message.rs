use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::application::dto::{CreateMessageInput, MessageView};
use crate::application::error::ApplicationError;
use crate::application::ports::{ConversationRepository, MessageRepository};
use crate::domain::{ConversationId, Message, UserId};

pub struct CreateMessageUseCase {
    message_repository: Arc<dyn MessageRepository>,
    conversation_repository: Arc<dyn ConversationRepository>,
}

impl CreateMessageUseCase {
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        conversation_repository: Arc<dyn ConversationRepository>,
    ) -> Self {
        Self {
            message_repository,
            conversation_repository,
        }
    }

    #[instrument(
        skip(self, input),
        fields(user_id = %user_id, conversation_id = %input.conversation_id, message_type = %input.message_type)
    )]
    pub async fn execute(
        &self,
        user_id: UserId,
        input: CreateMessageInput,
    ) -> Result<MessageView, ApplicationError> {
        let conversation_id: ConversationId = input.conversation_id.parse()?;

        let conversation = self
            .conversation_repository
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Conversation not found"))?;

        if !conversation.is_owned_by(user_id) {
            warn!("Message rejected: conversation belongs to another user");
            return Err(ApplicationError::validation(
                "You do not have permission to write to this conversation",
            ));
        }

        if !conversation.is_active {
            return Err(ApplicationError::validation("Conversation is inactive"));
        }

        let message = Message::new(
            conversation_id,
            user_id,
            input.content,
            input.message_type,
            input.metadata,
        );
        self.message_repository.create(&message).await?;

        // Not atomic with the insert above: a failure or a concurrent writer between
        // these calls leaves message_count / last_message_at stale.
        self.conversation_repository
            .increment_message_count(conversation_id)
            .await?;
        self.conversation_repository
            .update_last_message_time(conversation_id, Utc::now())
            .await?;

        info!(message_id = %message.id, "Message created");
        Ok(MessageView::from(&message))
    }
}
