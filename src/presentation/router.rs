use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, warn};

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::error::{expose_error_detail, route_not_found};
use crate::presentation::handlers::{
    conversation_notification_handler, create_conversation_handler, create_message_handler,
    deactivate_conversation_handler, deactivate_user_handler, health_handler,
    list_conversations_handler, list_messages_handler, list_users_handler, login_handler,
    n8n_create_conversation_handler, n8n_list_conversations_handler, n8n_send_message_handler,
    profile_handler, register_handler, webhook_test_handler,
};
use crate::presentation::middleware::{
    AllowedRoles, authenticate_token, authorize_roles, rate_limit_middleware,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let settings = state.settings.clone();

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let public = Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/users/register", post(register_handler))
        .route("/api/v1/users/login", post(login_handler));

    let authenticated = Router::new()
        .route("/api/v1/users/profile", get(profile_handler))
        .route(
            "/api/v1/conversations",
            post(create_conversation_handler).get(list_conversations_handler),
        )
        .route("/api/v1/conversations/messages", post(create_message_handler))
        .route(
            "/api/v1/conversations/{conversation_id}",
            delete(deactivate_conversation_handler),
        )
        .route(
            "/api/v1/conversations/{conversation_id}/messages",
            get(list_messages_handler),
        )
        .route_layer(from_fn_with_state(state.clone(), authenticate_token));

    // Layers run bottom-up: authenticate, then authorize.
    let admin = Router::new()
        .route("/api/v1/users", get(list_users_handler))
        .route("/api/v1/users/{user_id}", delete(deactivate_user_handler))
        .route_layer(from_fn_with_state(AllowedRoles::ADMIN_ONLY, authorize_roles))
        .route_layer(from_fn_with_state(state.clone(), authenticate_token));

    let mut router = Router::new().merge(public).merge(authenticated).merge(admin);

    if settings.features.integrations {
        router = router.merge(integration_routes(&state));
    }

    // A known path with the wrong verb reads as an unknown route, not a bare 405.
    router = router
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found);

    if settings.rate_limit.enabled {
        router = router.layer(from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ));
    }

    router
        .layer(from_fn_with_state(settings.environment, expose_error_detail))
        .layer(DefaultBodyLimit::max(settings.server.body_limit_bytes))
        .layer(from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors_layer(&settings.server.cors_origins))
        .with_state(state)
}

fn integration_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/n8n/conversations/create",
            post(n8n_create_conversation_handler),
        )
        .route("/api/v1/n8n/messages/send", post(n8n_send_message_handler))
        .route(
            "/api/v1/n8n/conversations/list",
            get(n8n_list_conversations_handler),
        )
        .route("/api/v1/webhooks/test", post(webhook_test_handler))
        .route_layer(from_fn_with_state(state.clone(), authenticate_token))
        // Added after the auth layer, so it stays open.
        .route(
            "/api/v1/webhooks/conversation-notification",
            post(conversation_notification_handler),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
