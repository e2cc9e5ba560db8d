use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};
use validator::Validate;

use crate::application::dto::{
    ConversationList, ConversationView, CreateConversationInput, CreateMessageInput, MessageView,
};
use crate::application::pagination::DEFAULT_PAGE_LIMIT;
use crate::domain::{MessageMetadata, MessageType};
use crate::presentation::error::ApiError;
use crate::presentation::handlers::IntegrationResponse;
use crate::presentation::middleware::{AuthenticatedUser, JsonBody, PageQuery, ValidatedJson};
use crate::presentation::state::AppState;

const N8N_SOURCE: &str = "n8n";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationCreatedOutput {
    pub conversation_id: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
}

#[instrument(skip(state, user, input), fields(user_id = %user.user_id))]
pub async fn n8n_create_conversation_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(input): ValidatedJson<CreateConversationInput>,
) -> Result<
    (
        StatusCode,
        Json<IntegrationResponse<ConversationView, ConversationCreatedOutput>>,
    ),
    ApiError,
> {
    let conversation = state
        .create_conversation
        .execute(user.user_id, input)
        .await?;

    let output = ConversationCreatedOutput {
        conversation_id: conversation.id.clone(),
        title: conversation.title.clone(),
        timestamp: conversation.created_at,
        user_id: user.user_id.to_string(),
    };

    Ok((
        StatusCode::CREATED,
        Json(IntegrationResponse::new(
            "Conversation created successfully",
            conversation,
            output,
        )),
    ))
}

/// Like `CreateMessageInput`, but `messageType` is optional and metadata is a
/// loose object the handler enriches before it is typed.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    #[validate(length(min = 1, message = "Conversation id is required"))]
    pub conversation_id: String,
    #[validate(length(
        min = 1,
        max = 10000,
        message = "Content must be between 1 and 10000 characters"
    ))]
    pub content: String,
    pub message_type: Option<MessageType>,
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSentOutput {
    pub message_id: String,
    pub conversation_id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub timestamp: DateTime<Utc>,
}

/// Caller keys win over the defaults.
fn integration_metadata(
    caller: Option<Map<String, Value>>,
    now: DateTime<Utc>,
) -> MessageMetadata {
    let mut merged = Map::new();
    merged.insert("source".to_string(), Value::from(N8N_SOURCE));
    merged.insert("timestamp".to_string(), Value::from(now.to_rfc3339()));
    merged.extend(caller.unwrap_or_default());
    MessageMetadata::new(merged)
}

#[instrument(skip(state, user, input), fields(user_id = %user.user_id))]
pub async fn n8n_send_message_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(input): ValidatedJson<SendMessageInput>,
) -> Result<(StatusCode, Json<IntegrationResponse<MessageView, MessageSentOutput>>), ApiError> {
    let metadata = integration_metadata(input.metadata, Utc::now());
    let message = state
        .create_message
        .execute(
            user.user_id,
            CreateMessageInput {
                conversation_id: input.conversation_id,
                content: input.content,
                message_type: input.message_type.unwrap_or(MessageType::User),
                metadata: Some(metadata),
            },
        )
        .await?;

    let output = MessageSentOutput {
        message_id: message.id.clone(),
        conversation_id: message.conversation_id.clone(),
        content: message.content.clone(),
        message_type: message.message_type,
        timestamp: message.timestamp,
    };

    Ok((
        StatusCode::CREATED,
        Json(IntegrationResponse::new(
            "Message sent successfully",
            message,
            output,
        )),
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub message_count: i64,
    pub last_activity: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[instrument(skip(state, user, query), fields(user_id = %user.user_id))]
pub async fn n8n_list_conversations_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    query: PageQuery,
) -> Result<Json<IntegrationResponse<ConversationList, Vec<ConversationSummary>>>, ApiError> {
    let list = state
        .get_conversations
        .execute(user.user_id, query.into_request(DEFAULT_PAGE_LIMIT))
        .await?;

    let output = list
        .conversations
        .iter()
        .map(|c| ConversationSummary {
            id: c.id.clone(),
            title: c.title.clone(),
            message_count: c.message_count,
            last_activity: c.last_message_at,
            is_active: c.is_active,
        })
        .collect();

    Ok(Json(IntegrationResponse::new(
        "Conversations retrieved successfully",
        list,
        output,
    )))
}

#[derive(Debug, Serialize)]
pub struct WebhookEcho {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub payload: Value,
}

#[derive(Debug, Serialize)]
pub struct WebhookTestResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub data: Value,
    pub output: WebhookEcho,
}

#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn webhook_test_handler(
    user: AuthenticatedUser,
    JsonBody(payload): JsonBody<Value>,
) -> Json<WebhookTestResponse> {
    let now = Utc::now();
    Json(WebhookTestResponse {
        success: true,
        message: "Webhook test succeeded".to_string(),
        timestamp: now,
        data: payload.clone(),
        output: WebhookEcho {
            status: "received".to_string(),
            timestamp: now,
            payload,
        },
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationNotification {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAck {
    pub success: bool,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub conversation_id: Option<String>,
    pub processed: bool,
    pub timestamp: DateTime<Utc>,
}

pub async fn conversation_notification_handler(
    JsonBody(notification): JsonBody<ConversationNotification>,
) -> Json<NotificationAck> {
    info!(
        kind = ?notification.kind,
        conversation_id = ?notification.conversation_id,
        has_data = notification.data.is_some(),
        "Conversation notification received"
    );

    Json(NotificationAck {
        success: true,
        message: "Notification received".to_string(),
        kind: notification.kind,
        conversation_id: notification.conversation_id,
        processed: true,
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn caller_metadata_overrides_integration_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut caller = Map::new();
        caller.insert("source".to_string(), Value::from("zapier"));
        caller.insert("aiModel".to_string(), Value::from("gpt-4"));

        let metadata = integration_metadata(Some(caller), now);

        assert_eq!(metadata.ai_model(), Some("gpt-4"));
        assert_eq!(metadata.get("source"), Some(&Value::from("zapier")));
        assert_eq!(
            metadata.get("timestamp"),
            Some(&Value::from(now.to_rfc3339()))
        );
    }

    #[test]
    fn caller_values_of_any_type_are_kept() {
        let mut caller = Map::new();
        caller.insert("tokens".to_string(), Value::from("many"));
        caller.insert("aiModel".to_string(), Value::Null);

        let metadata = integration_metadata(Some(caller), Utc::now());

        assert_eq!(metadata.get("tokens"), Some(&Value::from("many")));
        assert_eq!(metadata.get("aiModel"), Some(&Value::Null));
        assert!(metadata.tokens().is_none());
    }
}
