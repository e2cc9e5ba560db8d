mod authenticate_user;
mod create_conversation;
mod create_message;
mod create_user;
mod deactivate_conversation;
mod deactivate_user;
mod get_conversations;
mod get_messages;
mod get_users;

pub use authenticate_user::{AuthenticateUserUseCase, INVALID_CREDENTIALS};
pub use create_conversation::CreateConversationUseCase;
pub use create_message::CreateMessageUseCase;
pub use create_user::CreateUserUseCase;
pub use deactivate_conversation::DeactivateConversationUseCase;
pub use deactivate_user::DeactivateUserUseCase;
pub use get_conversations::GetConversationsUseCase;
pub use get_messages::GetMessagesUseCase;
pub use get_users::GetUsersUseCase;
