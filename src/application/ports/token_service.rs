use serde::{Deserialize, Serialize};

use crate::domain::{User, UserRole};

use super::CredentialError;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

pub trait TokenService: Send + Sync {
    fn issue(&self, user: &User) -> Result<String, CredentialError>;

    fn verify(&self, token: &str) -> Result<TokenClaims, CredentialError>;
}
