use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::pagination::{Page, PageRequest};
use crate::domain::{Conversation, ConversationId, UserId};

use super::RepositoryError;

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn find_by_id(&self, id: ConversationId)
    -> Result<Option<Conversation>, RepositoryError>;

    /// Active conversations of `user_id`, most recent activity first.
    async fn find_by_user_id(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<Conversation>, RepositoryError>;

    async fn find_active_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Conversation>, RepositoryError>;

    async fn create(&self, conversation: &Conversation) -> Result<(), RepositoryError>;

    /// Soft delete.
    async fn delete(&self, id: ConversationId) -> Result<bool, RepositoryError>;

    async fn increment_message_count(&self, id: ConversationId) -> Result<bool, RepositoryError>;

    async fn update_last_message_time(
        &self,
        id: ConversationId,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;
}
