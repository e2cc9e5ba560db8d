mod in_memory_repository;
mod pg_conversation_repository;
mod pg_message_repository;
mod pg_user_repository;

pub use in_memory_repository::{
    InMemoryConversationRepository, InMemoryMessageRepository, InMemoryUserRepository,
};
pub use pg_conversation_repository::PgConversationRepository;
pub use pg_message_repository::PgMessageRepository;
pub use pg_user_repository::PgUserRepository;
