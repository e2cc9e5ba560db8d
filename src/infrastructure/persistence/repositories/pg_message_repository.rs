use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::application::ports::{MessageRepository, RepositoryError};
use crate::domain::{ConversationId, Message, MessageId, MessageMetadata, MessageType, UserId};
use crate::infrastructure::persistence::pg_error::map_sqlx_error;

const MESSAGE_COLUMNS: &str =
    "id, conversation_id, user_id, content, message_type, sent_at, metadata";

#[derive(FromRow)]
struct MessageRow {
    id: Uuid,
    conversation_id: Uuid,
    user_id: Uuid,
    content: String,
    message_type: String,
    sent_at: DateTime<Utc>,
    metadata: Option<Json<MessageMetadata>>,
}

impl TryFrom<MessageRow> for Message {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let message_type = row
            .message_type
            .parse::<MessageType>()
            .map_err(|e| RepositoryError::QueryFailed(format!("corrupt stored row: {}", e)))?;

        Ok(Message {
            id: MessageId::from_uuid(row.id),
            conversation_id: ConversationId::from_uuid(row.conversation_id),
            user_id: UserId::from_uuid(row.user_id),
            content: row.content,
            message_type,
            timestamp: row.sent_at,
            metadata: row.metadata.map(|Json(metadata)| metadata),
        })
    }
}

pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self), fields(conversation_id = %conversation_id, page = page.page(), limit = page.limit()))]
    async fn find_by_conversation_id(
        &self,
        conversation_id: ConversationId,
        page: PageRequest,
    ) -> Result<Page<Message>, RepositoryError> {
        let list_sql = format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE conversation_id = $1
            ORDER BY sent_at ASC, seq ASC
            LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, MessageRow>(&list_sql)
            .bind(conversation_id.as_uuid())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool);
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE conversation_id = $1")
                .bind(conversation_id.as_uuid())
                .fetch_one(&self.pool);

        let (rows, total) = tokio::try_join!(rows, total).map_err(map_sqlx_error)?;

        let messages = rows
            .into_iter()
            .map(Message::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(messages, total, page))
    }

    #[instrument(skip(self, message), fields(message_id = %message.id, conversation_id = %message.conversation_id))]
    async fn create(&self, message: &Message) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, user_id, content, message_type, sent_at, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(message.conversation_id.as_uuid())
        .bind(message.user_id.as_uuid())
        .bind(&message.content)
        .bind(message.message_type.as_str())
        .bind(message.timestamp)
        .bind(message.metadata.as_ref().map(Json))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(conversation_id = %conversation_id))]
    async fn delete_by_conversation_id(
        &self,
        conversation_id: ConversationId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE conversation_id = $1")
            .bind(conversation_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(conversation_id = %conversation_id))]
    async fn count_by_conversation_id(
        &self,
        conversation_id: ConversationId,
    ) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE conversation_id = $1")
            .bind(conversation_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}
