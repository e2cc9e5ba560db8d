use async_trait::async_trait;
use tracing::instrument;

use crate::application::ports::{CredentialError, PasswordHasher};

/// bcrypt on the blocking pool; a cost-12 hash takes long enough to stall a
/// runtime worker otherwise.
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    #[instrument(skip_all, fields(cost = self.cost))]
    async fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| CredentialError::Hashing(e.to_string()))?
            .map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    #[instrument(skip_all)]
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| CredentialError::Hashing(e.to_string()))?
            .map_err(|e| CredentialError::Hashing(e.to_string()))
    }
}
