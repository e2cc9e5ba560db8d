use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::application::ports::{ConversationRepository, RepositoryError};
use crate::domain::{Conversation, ConversationId, UserId};
use crate::infrastructure::persistence::pg_error::map_sqlx_error;

const CONVERSATION_COLUMNS: &str = "id, user_id, title, description, is_active, message_count, \
     last_message_at, created_at, updated_at";

#[derive(FromRow)]
struct ConversationRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    is_active: bool,
    message_count: i64,
    last_message_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Conversation {
            id: ConversationId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            title: row.title,
            description: row.description,
            is_active: row.is_active,
            message_count: row.message_count,
            last_message_at: row.last_message_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    #[instrument(skip(self), fields(conversation_id = %id))]
    async fn find_by_id(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query_as::<_, ConversationRow>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Conversation::from))
    }

    #[instrument(skip(self), fields(user_id = %user_id, page = page.page(), limit = page.limit()))]
    async fn find_by_user_id(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<Conversation>, RepositoryError> {
        let list_sql = format!(
            r#"
            SELECT {CONVERSATION_COLUMNS}
            FROM conversations
            WHERE user_id = $1 AND is_active = TRUE
            ORDER BY last_message_at DESC NULLS LAST, created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, ConversationRow>(&list_sql)
            .bind(user_id.as_uuid())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool);
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM conversations WHERE user_id = $1 AND is_active = TRUE",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool);

        let (rows, total) = tokio::try_join!(rows, total).map_err(map_sqlx_error)?;

        Ok(Page::new(
            rows.into_iter().map(Conversation::from).collect(),
            total,
            page,
        ))
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn find_active_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query_as::<_, ConversationRow>(&format!(
            r#"
            SELECT {CONVERSATION_COLUMNS}
            FROM conversations
            WHERE user_id = $1 AND is_active = TRUE
            ORDER BY last_message_at DESC NULLS LAST, created_at DESC
            "#
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Conversation::from).collect())
    }

    #[instrument(skip(self, conversation), fields(conversation_id = %conversation.id))]
    async fn create(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO conversations
                (id, user_id, title, description, is_active, message_count, last_message_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(conversation.id.as_uuid())
        .bind(conversation.user_id.as_uuid())
        .bind(&conversation.title)
        .bind(&conversation.description)
        .bind(conversation.is_active)
        .bind(conversation.message_count)
        .bind(conversation.last_message_at)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(conversation_id = %id))]
    async fn delete(&self, id: ConversationId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE conversations SET is_active = FALSE, updated_at = $2 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(conversation_id = %id))]
    async fn increment_message_count(&self, id: ConversationId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE conversations SET message_count = message_count + 1, updated_at = $2 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(conversation_id = %id))]
    async fn update_last_message_time(
        &self,
        id: ConversationId,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE conversations SET last_message_at = $2, updated_at = $2 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(timestamp)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
