use async_trait::async_trait;

use crate::application::pagination::{Page, PageRequest};
use crate::domain::{ConversationId, Message};

use super::RepositoryError;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Oldest first.
    async fn find_by_conversation_id(
        &self,
        conversation_id: ConversationId,
        page: PageRequest,
    ) -> Result<Page<Message>, RepositoryError>;

    async fn create(&self, message: &Message) -> Result<(), RepositoryError>;

    /// Physical removal, used only when cleaning up after a conversation.
    async fn delete_by_conversation_id(
        &self,
        conversation_id: ConversationId,
    ) -> Result<u64, RepositoryError>;

    async fn count_by_conversation_id(
        &self,
        conversation_id: ConversationId,
    ) -> Result<i64, RepositoryError>;
}
