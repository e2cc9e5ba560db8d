use std::sync::Arc;

use crate::application::ports::{PasswordHasher, Repositories, TokenService};
use crate::application::use_cases::{
    AuthenticateUserUseCase, CreateConversationUseCase, CreateMessageUseCase, CreateUserUseCase,
    DeactivateConversationUseCase, DeactivateUserUseCase, GetConversationsUseCase,
    GetMessagesUseCase, GetUsersUseCase,
};
use crate::infrastructure::persistence::Database;
use crate::presentation::config::Settings;
use crate::presentation::middleware::RateLimiter;

/// Composition root shared by every handler. Cloning is cheap: everything is
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub create_user: Arc<CreateUserUseCase>,
    pub authenticate_user: Arc<AuthenticateUserUseCase>,
    pub get_users: Arc<GetUsersUseCase>,
    pub deactivate_user: Arc<DeactivateUserUseCase>,
    pub create_conversation: Arc<CreateConversationUseCase>,
    pub get_conversations: Arc<GetConversationsUseCase>,
    pub deactivate_conversation: Arc<DeactivateConversationUseCase>,
    pub create_message: Arc<CreateMessageUseCase>,
    pub get_messages: Arc<GetMessagesUseCase>,
    pub token_service: Arc<dyn TokenService>,
    pub rate_limiter: RateLimiter,
    pub settings: Arc<Settings>,
    /// `None` for the in-memory backend.
    pub database: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(
        repositories: Repositories,
        password_hasher: Arc<dyn PasswordHasher>,
        token_service: Arc<dyn TokenService>,
        settings: Settings,
        database: Option<Arc<Database>>,
    ) -> Self {
        let Repositories {
            users,
            conversations,
            messages,
        } = repositories;

        let rate_limiter = RateLimiter::new(
            settings.rate_limit.max_requests,
            settings.rate_limit.window,
        );

        Self {
            create_user: Arc::new(CreateUserUseCase::new(
                Arc::clone(&users),
                Arc::clone(&password_hasher),
            )),
            authenticate_user: Arc::new(AuthenticateUserUseCase::new(
                Arc::clone(&users),
                password_hasher,
                Arc::clone(&token_service),
            )),
            get_users: Arc::new(GetUsersUseCase::new(Arc::clone(&users))),
            deactivate_user: Arc::new(DeactivateUserUseCase::new(Arc::clone(&users))),
            create_conversation: Arc::new(CreateConversationUseCase::new(
                Arc::clone(&conversations),
                users,
            )),
            get_conversations: Arc::new(GetConversationsUseCase::new(Arc::clone(&conversations))),
            deactivate_conversation: Arc::new(DeactivateConversationUseCase::new(Arc::clone(
                &conversations,
            ))),
            create_message: Arc::new(CreateMessageUseCase::new(
                Arc::clone(&messages),
                Arc::clone(&conversations),
            )),
            get_messages: Arc::new(GetMessagesUseCase::new(messages, conversations)),
            token_service,
            rate_limiter,
            settings: Arc::new(settings),
            database,
        }
    }
}
