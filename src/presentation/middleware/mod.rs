mod auth;
mod rate_limit;
mod validation;

pub use auth::{AllowedRoles, AuthenticatedUser, authenticate_token, authorize_roles};
pub use rate_limit::{RateLimiter, rate_limit_middleware};
pub use validation::{JsonBody, PageQuery, ValidatedJson};
