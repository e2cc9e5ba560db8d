use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::application::pagination::PageRequest;
use crate::presentation::error::ApiError;

/// `Json<T>` whose rejections render through `ApiError`.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(json_rejection)?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge;
    }
    ApiError::bad_request(rejection.body_text())
}

/// JSON body that is deserialized and then checked against its `Validate` rules.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(request, state).await?;
        value
            .validate()
            .map_err(|e| ApiError::bad_request(validation_message(&e)))?;
        Ok(Self(value))
    }
}

/// All field messages joined with `, `, ordered by field name.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Default, Deserialize)]
struct RawPageQuery {
    page: Option<i64>,
    limit: Option<i64>,
}

/// `?page&limit`, both optional integers. Clamping happens in `PageRequest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn into_request(self, default_limit: i64) -> PageRequest {
        PageRequest::from_query(self.page, self.limit, default_limit)
    }
}

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawPageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request("page and limit must be integers"))?;
        Ok(Self {
            page: raw.page,
            limit: raw.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::CreateUserInput;

    #[test]
    fn every_failing_field_contributes_a_message() {
        let input = CreateUserInput {
            email: "not-an-email".to_string(),
            name: "A".to_string(),
            password: "123".to_string(),
            role: None,
        };

        let message = validation_message(&input.validate().unwrap_err());

        assert_eq!(
            message,
            "Must be a valid email, Name must be between 2 and 50 characters, \
             Password must be between 6 and 100 characters"
        );
    }
}
