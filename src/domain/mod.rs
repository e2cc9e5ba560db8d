mod conversation;
mod conversation_id;
mod id_parse_error;
mod message;
mod message_id;
mod message_type;
mod user;
mod user_id;
mod user_role;

pub use conversation::{Conversation, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
pub use conversation_id::ConversationId;
pub use id_parse_error::IdParseError;
pub use message::{MAX_CONTENT_LENGTH, Message, MessageMetadata};
pub use message_id::MessageId;
pub use message_type::MessageType;
pub use user::{User, normalize_email};
pub use user_id::UserId;
pub use user_role::UserRole;
