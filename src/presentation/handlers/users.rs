use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::application::ApplicationError;
use crate::application::dto::{AuthView, CreateUserInput, LoginInput, UserList, UserView};
use crate::application::pagination::DEFAULT_PAGE_LIMIT;
use crate::application::ports::TokenClaims;
use crate::domain::UserId;
use crate::presentation::error::ApiError;
use crate::presentation::handlers::ApiResponse;
use crate::presentation::middleware::{AuthenticatedUser, PageQuery, ValidatedJson};
use crate::presentation::state::AppState;

#[instrument(skip_all)]
pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateUserInput>,
) -> Result<(StatusCode, Json<ApiResponse<UserView>>), ApiError> {
    let user = state.create_user.execute(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("User created successfully", user)),
    ))
}

#[instrument(skip_all)]
pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginInput>,
) -> Result<Json<ApiResponse<AuthView>>, ApiError> {
    let auth = state.authenticate_user.execute(input).await?;
    Ok(Json(ApiResponse::new("Authentication successful", auth)))
}

pub async fn profile_handler(user: AuthenticatedUser) -> Json<ApiResponse<TokenClaims>> {
    Json(ApiResponse::new("Profile retrieved successfully", user.claims))
}

#[instrument(skip(state, query))]
pub async fn list_users_handler(
    State(state): State<AppState>,
    query: PageQuery,
) -> Result<Json<ApiResponse<UserList>>, ApiError> {
    let users = state
        .get_users
        .execute(query.into_request(DEFAULT_PAGE_LIMIT))
        .await?;
    Ok(Json(ApiResponse::new("Users retrieved successfully", users)))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.user_id))]
pub async fn deactivate_user_handler(
    State(state): State<AppState>,
    admin: AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let user_id: UserId = user_id.parse().map_err(ApplicationError::from)?;
    state.deactivate_user.execute(user_id).await?;
    Ok(Json(ApiResponse::new("User deactivated successfully", ())))
}
