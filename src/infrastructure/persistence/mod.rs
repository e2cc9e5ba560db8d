mod pg_error;
mod pg_pool;
mod repositories;

use std::sync::Arc;

use sqlx::PgPool;

use crate::application::ports::Repositories;

pub use pg_pool::{ConnectionStatus, Database, DatabaseOptions, run_migrations};
pub use repositories::{
    InMemoryConversationRepository, InMemoryMessageRepository, InMemoryUserRepository,
    PgConversationRepository, PgMessageRepository, PgUserRepository,
};

pub fn pg_repositories(pool: PgPool) -> Repositories {
    Repositories {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        conversations: Arc::new(PgConversationRepository::new(pool.clone())),
        messages: Arc::new(PgMessageRepository::new(pool)),
    }
}

pub fn in_memory_repositories() -> Repositories {
    Repositories {
        users: Arc::new(InMemoryUserRepository::new()),
        conversations: Arc::new(InMemoryConversationRepository::new()),
        messages: Arc::new(InMemoryMessageRepository::new()),
    }
}
