use async_trait::async_trait;

use super::CredentialError;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, CredentialError>;

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError>;
}
