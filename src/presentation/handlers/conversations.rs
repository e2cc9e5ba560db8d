use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::application::ApplicationError;
use crate::application::dto::{
    ConversationList, ConversationView, CreateConversationInput, CreateMessageInput, MessageList,
    MessageView,
};
use crate::application::pagination::{DEFAULT_MESSAGE_PAGE_LIMIT, DEFAULT_PAGE_LIMIT};
use crate::domain::ConversationId;
use crate::presentation::error::ApiError;
use crate::presentation::handlers::ApiResponse;
use crate::presentation::middleware::{AuthenticatedUser, PageQuery, ValidatedJson};
use crate::presentation::state::AppState;

#[instrument(skip(state, user, input), fields(user_id = %user.user_id))]
pub async fn create_conversation_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(input): ValidatedJson<CreateConversationInput>,
) -> Result<(StatusCode, Json<ApiResponse<ConversationView>>), ApiError> {
    let conversation = state
        .create_conversation
        .execute(user.user_id, input)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Conversation created successfully",
            conversation,
        )),
    ))
}

#[instrument(skip(state, user, query), fields(user_id = %user.user_id))]
pub async fn list_conversations_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    query: PageQuery,
) -> Result<Json<ApiResponse<ConversationList>>, ApiError> {
    let conversations = state
        .get_conversations
        .execute(user.user_id, query.into_request(DEFAULT_PAGE_LIMIT))
        .await?;
    Ok(Json(ApiResponse::new(
        "Conversations retrieved successfully",
        conversations,
    )))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn deactivate_conversation_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(conversation_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let conversation_id: ConversationId =
        conversation_id.parse().map_err(ApplicationError::from)?;
    state
        .deactivate_conversation
        .execute(user.user_id, conversation_id)
        .await?;
    Ok(Json(ApiResponse::new(
        "Conversation deactivated successfully",
        (),
    )))
}

#[instrument(skip(state, user, input), fields(user_id = %user.user_id))]
pub async fn create_message_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(input): ValidatedJson<CreateMessageInput>,
) -> Result<(StatusCode, Json<ApiResponse<MessageView>>), ApiError> {
    let message = state.create_message.execute(user.user_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Message created successfully", message)),
    ))
}

#[instrument(skip(state, user, query), fields(user_id = %user.user_id))]
pub async fn list_messages_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(conversation_id): Path<String>,
    query: PageQuery,
) -> Result<Json<ApiResponse<MessageList>>, ApiError> {
    let conversation_id: ConversationId =
        conversation_id.parse().map_err(ApplicationError::from)?;
    let messages = state
        .get_messages
        .execute(
            user.user_id,
            conversation_id,
            query.into_request(DEFAULT_MESSAGE_PAGE_LIMIT),
        )
        .await?;
    Ok(Json(ApiResponse::new(
        "Messages retrieved successfully",
        messages,
    )))
}
