use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::application::ApplicationError;
use crate::application::ports::{CredentialError, RepositoryError};
use crate::presentation::config::Environment;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests from this IP, please try again later";

/// Every failure an HTTP handler or middleware can surface. The only place
/// that decides status codes and client-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("too many requests")]
    TooManyRequests,
    #[error("request body too large")]
    PayloadTooLarge,
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ApiError::TooManyRequests => {
                (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE.to_string())
            }
            ApiError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large".to_string())
            }
            ApiError::Application(e) => application_status(e),
        }
    }
}

fn application_status(error: &ApplicationError) -> (StatusCode, String) {
    match error {
        ApplicationError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
        ApplicationError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
        ApplicationError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
        ApplicationError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
        ApplicationError::InvalidIdentifier(_) => {
            (StatusCode::BAD_REQUEST, "Invalid ID".to_string())
        }
        ApplicationError::Repository(e) => match e {
            RepositoryError::InvalidData(_) => {
                (StatusCode::BAD_REQUEST, "Invalid input data".to_string())
            }
            RepositoryError::ConstraintViolation(_) => {
                (StatusCode::CONFLICT, "Resource already exists".to_string())
            }
            RepositoryError::InvalidIdentifier(_) => {
                (StatusCode::BAD_REQUEST, "Invalid ID".to_string())
            }
            RepositoryError::NotFound(_) => {
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }
            RepositoryError::ConnectionFailed(_) | RepositoryError::QueryFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
            }
        },
        ApplicationError::Credentials(CredentialError::Expired)
        | ApplicationError::Credentials(CredentialError::InvalidToken(_)) => {
            (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
        }
        ApplicationError::Credentials(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
        }
    }
}

/// Attached to every error response so `expose_error_detail` can add the
/// internal error chain outside production.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let detail = format!("{:?}", self);

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, detail = %detail, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            success: false,
            message: message.clone(),
            stack: None,
        };

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorReport {
            status,
            message,
            detail,
        });
        response
    }
}

/// Re-renders error responses with a `stack` field when the environment allows it.
pub async fn expose_error_detail(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !environment.exposes_error_detail() {
        return response;
    }

    match response.extensions().get::<ErrorReport>().cloned() {
        Some(report) => {
            let body = ErrorBody {
                success: false,
                message: report.message,
                stack: Some(report.detail),
            };
            let mut rendered = (report.status, Json(body)).into_response();
            for (name, value) in response.headers() {
                if *name != header::CONTENT_LENGTH && *name != header::CONTENT_TYPE {
                    rendered.headers_mut().append(name.clone(), value.clone());
                }
            }
            rendered
        }
        None => response,
    }
}

pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Route {} not found", uri))
}
