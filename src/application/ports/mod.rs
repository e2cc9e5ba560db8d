mod conversation_repository;
mod credential_error;
mod message_repository;
mod password_hasher;
mod repositories;
mod repository_error;
mod token_service;
mod user_repository;

pub use conversation_repository::ConversationRepository;
pub use credential_error::CredentialError;
pub use message_repository::MessageRepository;
pub use password_hasher::PasswordHasher;
pub use repositories::Repositories;
pub use repository_error::RepositoryError;
pub use token_service::{TokenClaims, TokenService};
pub use user_repository::UserRepository;
