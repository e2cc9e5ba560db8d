mod conversations;
mod health;
mod integrations;
mod response;
mod users;

pub use conversations::{
    create_conversation_handler, create_message_handler, deactivate_conversation_handler,
    list_conversations_handler, list_messages_handler,
};
pub use health::health_handler;
pub use integrations::{
    conversation_notification_handler, n8n_create_conversation_handler,
    n8n_list_conversations_handler, n8n_send_message_handler, webhook_test_handler,
};
pub use response::{ApiResponse, IntegrationResponse};
pub use users::{
    deactivate_user_handler, list_users_handler, login_handler, profile_handler,
    register_handler,
};
