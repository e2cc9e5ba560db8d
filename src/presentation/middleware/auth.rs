use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use crate::application::ports::{CredentialError, TokenClaims};
use crate::domain::{UserId, UserRole};
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

pub const ACCESS_TOKEN_REQUIRED: &str = "Access token required";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const INSUFFICIENT_PERMISSIONS: &str = "Insufficient permissions";
pub const NOT_AUTHENTICATED: &str = "User not authenticated";

/// Identity attached to the request by `authenticate_token`. Also usable as a
/// handler extractor.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: UserRole,
    pub claims: TokenClaims,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized(NOT_AUTHENTICATED))
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn authenticate_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(&request) else {
        return Err(ApiError::unauthorized(ACCESS_TOKEN_REQUIRED));
    };

    let claims = state.token_service.verify(token).map_err(|e| {
        match &e {
            CredentialError::Expired => debug!("Expired access token"),
            other => warn!(error = %other, "Rejected access token"),
        }
        ApiError::unauthorized(INVALID_TOKEN)
    })?;

    let user_id: UserId = claims
        .user_id
        .parse()
        .map_err(|_| ApiError::unauthorized(INVALID_TOKEN))?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        role: claims.role,
        claims,
    });

    Ok(next.run(request).await)
}

#[derive(Debug, Clone, Copy)]
pub struct AllowedRoles(pub &'static [UserRole]);

impl AllowedRoles {
    pub const ADMIN_ONLY: AllowedRoles = AllowedRoles(&[UserRole::Admin]);

    pub fn permits(&self, role: UserRole) -> bool {
        self.0.contains(&role)
    }
}

/// Must run after `authenticate_token`; with `route_layer` that means it is
/// added first.
pub async fn authorize_roles(
    State(allowed): State<AllowedRoles>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(user) = request.extensions().get::<AuthenticatedUser>() else {
        return Err(ApiError::unauthorized(NOT_AUTHENTICATED));
    };

    if !allowed.permits(user.role) {
        warn!(user_id = %user.user_id, role = %user.role, "Role not permitted for route");
        return Err(ApiError::unauthorized(INSUFFICIENT_PERMISSIONS));
    }

    Ok(next.run(request).await)
}
