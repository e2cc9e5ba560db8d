use crate::application::ports::{CredentialError, RepositoryError};
use crate::domain::IdParseError;

/// Failures a use case reports to its caller. The HTTP layer owns the
/// mapping to status codes.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    InvalidIdentifier(#[from] IdParseError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("credentials: {0}")]
    Credentials(#[from] CredentialError),
}

impl ApplicationError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}
