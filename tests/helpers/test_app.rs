use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use imaginarium::application::ports::Repositories;
use imaginarium::infrastructure::auth::{BcryptPasswordHasher, JwtTokenService};
use imaginarium::infrastructure::persistence::in_memory_repositories;
use imaginarium::presentation::config::DatabaseBackend;
use imaginarium::presentation::{AppState, Environment, Settings, create_router};

pub const TEST_JWT_SECRET: &str = "test-secret";

pub fn test_settings() -> Settings {
    let mut settings =
        Settings::defaults(Environment::Test).expect("Default settings should deserialize");
    settings.database.backend = DatabaseBackend::Memory;
    settings.auth.jwt_secret = TEST_JWT_SECRET.to_string();
    settings.auth.bcrypt_cost = 4;
    settings
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// A router over fresh in-memory repositories.
pub struct TestApp {
    pub router: Router,
    pub repositories: Repositories,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let repositories = in_memory_repositories();
        let hasher = Arc::new(BcryptPasswordHasher::new(settings.auth.bcrypt_cost));
        let tokens = Arc::new(JwtTokenService::new(
            &settings.auth.jwt_secret,
            settings.auth.token_ttl,
        ));
        let state = AppState::new(repositories.clone(), hasher, tokens, settings, None);

        Self {
            router: create_router(state),
            repositories,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router should not fail");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Body should be readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Request should build");

        self.send(request).await
    }

    pub async fn register(&self, email: &str, password: &str, role: Option<&str>) -> TestResponse {
        let mut body = json!({ "email": email, "name": "Test User", "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        self.request(Method::POST, "/api/v1/users/register", None, Some(body))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/v1/users/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registers and logs in, returning `(user_id, token)`.
    pub async fn signed_in(&self, email: &str, role: Option<&str>) -> (String, String) {
        let registered = self.register(email, "password123", role).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);

        let login = self.login(email, "password123").await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);

        let user_id = login.body["data"]["user"]["id"]
            .as_str()
            .expect("user id")
            .to_string();
        let token = login.body["data"]["token"]
            .as_str()
            .expect("token")
            .to_string();
        (user_id, token)
    }

    pub async fn create_conversation(&self, token: &str, title: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/v1/conversations",
                Some(token),
                Some(json!({ "title": title })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"]
            .as_str()
            .expect("conversation id")
            .to_string()
    }
}
