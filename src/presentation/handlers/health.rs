use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthFeatures {
    pub integrations: bool,
    pub rate_limit: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub environment: String,
    pub database: String,
    pub features: HealthFeatures,
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let database = match &state.database {
        Some(database) => database.status().as_str(),
        None => "memory",
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            success: true,
            status: "healthy".to_string(),
            message: "API is up and running".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: state.settings.environment.to_string(),
            database: database.to_string(),
            features: HealthFeatures {
                integrations: state.settings.features.integrations,
                rate_limit: state.settings.rate_limit.enabled,
            },
        }),
    )
}
