use async_trait::async_trait;

use crate::application::pagination::{Page, PageRequest};
use crate::domain::{User, UserId};

use super::RepositoryError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Resolves inactive users too; only listings filter on `is_active`.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Active users, newest first.
    async fn find_all(&self, page: PageRequest) -> Result<Page<User>, RepositoryError>;

    /// Fails with `ConstraintViolation` when the normalized email already exists.
    async fn create(&self, user: &User) -> Result<(), RepositoryError>;

    /// Soft delete. Returns `false` when no user has this id.
    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError>;
}
