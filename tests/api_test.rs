mod helpers;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;

use imaginarium::presentation::Environment;

use helpers::{TestApp, test_settings};

#[tokio::test]
async fn given_running_server_when_health_check_then_returns_healthy() {
    let app = TestApp::new();

    let response = app.request(Method::GET, "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], json!(true));
    assert_eq!(response.body["status"], json!("healthy"));
    assert_eq!(response.body["database"], json!("memory"));
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn given_inbound_request_id_when_handled_then_it_is_echoed() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.headers["x-request-id"], "trace-me-123");
}

#[tokio::test]
async fn given_unknown_route_when_requested_then_404_names_the_path() {
    let app = TestApp::new();

    let response = app.request(Method::GET, "/api/v1/nope", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], json!(false));
    assert_eq!(response.body["message"], json!("Route /api/v1/nope not found"));
}

#[tokio::test]
async fn given_known_path_when_called_with_wrong_method_then_404_envelope() {
    let app = TestApp::new();

    let response = app
        .request(Method::GET, "/api/v1/users/register", None, None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], json!(false));
    assert_eq!(
        response.body["message"],
        json!("Route /api/v1/users/register not found")
    );
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn given_authenticated_path_when_called_with_wrong_method_then_404_envelope() {
    let app = TestApp::new();

    let response = app
        .request(Method::PUT, "/api/v1/conversations/messages", None, None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body["message"],
        json!("Route /api/v1/conversations/messages not found")
    );
}

#[tokio::test]
async fn given_new_email_when_registering_then_created_without_password_fields() {
    let app = TestApp::new();

    let response = app.register("Ada@Example.com", "password123", None).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], json!(true));
    let user = &response.body["data"];
    assert_eq!(user["email"], json!("ada@example.com"));
    assert_eq!(user["role"], json!("user"));
    assert_eq!(user["isActive"], json!(true));
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());
}

#[tokio::test]
async fn given_registered_email_in_other_case_when_registering_again_then_conflict() {
    let app = TestApp::new();
    app.register("ada@example.com", "password123", None).await;

    let response = app.register("ADA@example.com", "password123", None).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], json!("Email is already registered"));
}

#[tokio::test]
async fn given_invalid_registration_when_submitted_then_400_lists_every_problem() {
    let app = TestApp::new();

    let response = app
        .request(
            Method::POST,
            "/api/v1/users/register",
            None,
            Some(json!({ "email": "nope", "name": "A", "password": "123" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let message = response.body["message"].as_str().unwrap();
    assert!(message.contains("Must be a valid email"));
    assert!(message.contains("Name must be between 2 and 50 characters"));
    assert!(message.contains("Password must be between 6 and 100 characters"));
}

#[tokio::test]
async fn given_malformed_json_when_registering_then_bad_request() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/register")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], json!(false));
}

#[tokio::test]
async fn given_wrong_password_or_unknown_email_when_logging_in_then_same_401() {
    let app = TestApp::new();
    app.register("ada@example.com", "password123", None).await;

    let wrong_password = app.login("ada@example.com", "not-it").await;
    let unknown = app.login("nobody@example.com", "password123").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body["message"], json!("Invalid credentials"));
    assert_eq!(wrong_password.body["message"], unknown.body["message"]);
}

#[tokio::test]
async fn given_no_token_when_reading_profile_then_access_token_required() {
    let app = TestApp::new();

    let response = app
        .request(Method::GET, "/api/v1/users/profile", None, None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], json!("Access token required"));
}

#[tokio::test]
async fn given_bad_token_when_reading_profile_then_invalid_token() {
    let app = TestApp::new();

    let response = app
        .request(Method::GET, "/api/v1/users/profile", Some("abc.def.ghi"), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], json!("Invalid token"));
}

#[tokio::test]
async fn given_valid_token_when_reading_profile_then_returns_claims() {
    let app = TestApp::new();
    let (user_id, token) = app.signed_in("ada@example.com", None).await;

    let response = app
        .request(Method::GET, "/api/v1/users/profile", Some(&token), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["userId"], json!(user_id));
    assert_eq!(response.body["data"]["email"], json!("ada@example.com"));
    assert_eq!(response.body["data"]["role"], json!("user"));
    let issued_at = response.body["data"]["iat"].as_i64().unwrap();
    assert!(response.body["data"]["exp"].as_i64().unwrap() > issued_at);
}

#[tokio::test]
async fn given_regular_user_when_listing_users_then_insufficient_permissions() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("ada@example.com", None).await;

    let response = app
        .request(Method::GET, "/api/v1/users", Some(&token), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], json!("Insufficient permissions"));
}

#[tokio::test]
async fn given_admin_when_listing_users_then_paginated_without_passwords() {
    let app = TestApp::new();
    let (_, admin_token) = app.signed_in("admin@example.com", Some("admin")).await;
    app.register("ada@example.com", "password123", None).await;

    let response = app
        .request(Method::GET, "/api/v1/users?page=1&limit=1", Some(&admin_token), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["total"], json!(2));
    assert_eq!(data["limit"], json!(1));
    assert_eq!(data["totalPages"], json!(2));
    assert_eq!(data["users"].as_array().unwrap().len(), 1);
    assert!(!response.body.to_string().contains("password"));
}

#[tokio::test]
async fn given_admin_when_deactivating_user_then_user_can_no_longer_log_in() {
    let app = TestApp::new();
    let (_, admin_token) = app.signed_in("admin@example.com", Some("admin")).await;
    let (user_id, _) = app.signed_in("ada@example.com", None).await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/users/{}", user_id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let login = app.login("ada@example.com", "password123").await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);
    assert_eq!(login.body["message"], json!("Invalid credentials"));
}

#[tokio::test]
async fn given_authenticated_user_when_running_full_conversation_flow_then_everything_lines_up() {
    let app = TestApp::new();
    let (user_id, token) = app.signed_in("ada@example.com", None).await;

    let created = app
        .request(
            Method::POST,
            "/api/v1/conversations",
            Some(&token),
            Some(json!({ "title": "Analytical engines", "description": "notes" })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["messageCount"], json!(0));
    assert_eq!(created.body["data"]["userId"], json!(user_id));
    let conversation_id = created.body["data"]["id"].as_str().unwrap().to_string();

    for (content, kind) in [("Hello", "user"), ("Hi there", "ai")] {
        let sent = app
            .request(
                Method::POST,
                "/api/v1/conversations/messages",
                Some(&token),
                Some(json!({
                    "conversationId": conversation_id,
                    "content": content,
                    "messageType": kind,
                    "metadata": { "aiModel": "gpt-4", "custom": true }
                })),
            )
            .await;
        assert_eq!(sent.status, StatusCode::CREATED, "{}", sent.body);
        assert_eq!(sent.body["data"]["metadata"]["custom"], json!(true));
    }

    let messages = app
        .request(
            Method::GET,
            &format!("/api/v1/conversations/{}/messages", conversation_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(messages.status, StatusCode::OK);
    assert_eq!(messages.body["data"]["limit"], json!(50));
    let listed = messages.body["data"]["messages"].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["content"], json!("Hello"));
    assert_eq!(listed[1]["messageType"], json!("ai"));

    let conversations = app
        .request(Method::GET, "/api/v1/conversations", Some(&token), None)
        .await;
    assert_eq!(conversations.status, StatusCode::OK);
    let data = &conversations.body["data"];
    assert_eq!(data["total"], json!(1));
    assert_eq!(data["limit"], json!(10));
    assert_eq!(data["conversations"][0]["messageCount"], json!(2));
    assert!(data["conversations"][0]["lastMessageAt"].is_string());
}

#[tokio::test]
async fn given_metadata_with_unusual_value_types_when_posting_message_then_stored_as_sent() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("ada@example.com", None).await;
    let conversation_id = app.create_conversation(&token, "loose metadata").await;
    let metadata = json!({
        "tokens": 1.5,
        "processingTime": "120ms",
        "aiModel": null,
        "x": 1
    });

    let sent = app
        .request(
            Method::POST,
            "/api/v1/conversations/messages",
            Some(&token),
            Some(json!({
                "conversationId": conversation_id,
                "content": "hello",
                "messageType": "ai",
                "metadata": metadata
            })),
        )
        .await;
    assert_eq!(sent.status, StatusCode::CREATED, "{}", sent.body);
    assert_eq!(sent.body["data"]["metadata"], metadata);

    let listed = app
        .request(
            Method::GET,
            &format!("/api/v1/conversations/{}/messages", conversation_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(listed.body["data"]["messages"][0]["metadata"], metadata);
}

#[tokio::test]
async fn given_other_users_conversation_when_posting_message_then_rejected() {
    let app = TestApp::new();
    let (_, owner) = app.signed_in("owner@example.com", None).await;
    let (_, intruder) = app.signed_in("intruder@example.com", None).await;
    let conversation_id = app.create_conversation(&owner, "private").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/conversations/messages",
            Some(&intruder),
            Some(json!({
                "conversationId": conversation_id,
                "content": "let me in",
                "messageType": "user"
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let owner_view = app
        .request(Method::GET, "/api/v1/conversations", Some(&owner), None)
        .await;
    assert_eq!(
        owner_view.body["data"]["conversations"][0]["messageCount"],
        json!(0)
    );
}

#[tokio::test]
async fn given_unknown_message_type_when_posting_then_bad_request() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("ada@example.com", None).await;
    let conversation_id = app.create_conversation(&token, "typed").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/conversations/messages",
            Some(&token),
            Some(json!({
                "conversationId": conversation_id,
                "content": "hello",
                "messageType": "robot"
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_malformed_conversation_id_when_listing_messages_then_invalid_id() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("ada@example.com", None).await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/conversations/not-a-uuid/messages",
            Some(&token),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], json!("Invalid ID"));
}

#[tokio::test]
async fn given_non_numeric_paging_when_listing_then_bad_request() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("ada@example.com", None).await;

    let response = app
        .request(Method::GET, "/api/v1/conversations?page=abc", Some(&token), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_owner_when_deactivating_conversation_then_it_leaves_the_listing() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("ada@example.com", None).await;
    let conversation_id = app.create_conversation(&token, "temporary").await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/conversations/{}", conversation_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let listed = app
        .request(Method::GET, "/api/v1/conversations", Some(&token), None)
        .await;
    assert_eq!(listed.body["data"]["total"], json!(0));
}

#[tokio::test]
async fn given_small_rate_limit_when_exceeded_then_429_while_health_stays_open() {
    let mut settings = test_settings();
    settings.rate_limit.max_requests = 2;
    let app = TestApp::with_settings(settings);

    let from = |uri: &str| {
        Request::builder()
            .uri(uri)
            .header("x-forwarded-for", "203.0.113.9")
            .body(Body::empty())
            .unwrap()
    };

    assert_eq!(app.send(from("/api/v1/conversations")).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.send(from("/api/v1/conversations")).await.status, StatusCode::UNAUTHORIZED);

    let limited = app.send(from("/api/v1/conversations")).await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(limited.body["success"], json!(false));

    assert_eq!(app.send(from("/health")).await.status, StatusCode::OK);
}

#[tokio::test]
async fn given_test_environment_when_error_returned_then_stack_is_included() {
    let app = TestApp::new();

    let response = app.request(Method::GET, "/missing", None, None).await;

    assert!(response.body["stack"].is_string());
}

#[tokio::test]
async fn given_prod_environment_when_error_returned_then_stack_is_hidden() {
    let mut settings = test_settings();
    settings.environment = Environment::Prod;
    let app = TestApp::with_settings(settings);

    let response = app.request(Method::GET, "/missing", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.get("stack").is_none());
}

#[tokio::test]
async fn given_n8n_client_when_sending_message_then_metadata_is_enriched_and_output_flattened() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("bot@example.com", None).await;

    let created = app
        .request(
            Method::POST,
            "/api/v1/n8n/conversations/create",
            Some(&token),
            Some(json!({ "title": "From n8n" })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let conversation_id = created.body["output"]["conversationId"]
        .as_str()
        .unwrap()
        .to_string();

    let sent = app
        .request(
            Method::POST,
            "/api/v1/n8n/messages/send",
            Some(&token),
            Some(json!({
                "conversationId": conversation_id,
                "content": "automated hello",
                "metadata": { "workflow": "daily" }
            })),
        )
        .await;
    assert_eq!(sent.status, StatusCode::CREATED, "{}", sent.body);
    assert_eq!(sent.body["output"]["type"], json!("user"));
    assert_eq!(sent.body["data"]["metadata"]["source"], json!("n8n"));
    assert_eq!(sent.body["data"]["metadata"]["workflow"], json!("daily"));
    assert!(sent.body["data"]["metadata"]["timestamp"].is_string());

    let listed = app
        .request(Method::GET, "/api/v1/n8n/conversations/list", Some(&token), None)
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["output"][0]["messageCount"], json!(1));
    assert_eq!(listed.body["output"][0]["isActive"], json!(true));
}

#[tokio::test]
async fn given_notification_without_token_when_posted_then_acknowledged() {
    let app = TestApp::new();

    let response = app
        .request(
            Method::POST,
            "/api/v1/webhooks/conversation-notification",
            None,
            Some(json!({ "type": "created", "conversationId": "abc" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["processed"], json!(true));
    assert_eq!(response.body["type"], json!("created"));
    assert_eq!(response.body["conversationId"], json!("abc"));
}

#[tokio::test]
async fn given_webhook_test_without_token_when_posted_then_unauthorized() {
    let app = TestApp::new();

    let response = app
        .request(
            Method::POST,
            "/api/v1/webhooks/test",
            None,
            Some(json!({ "ping": 1 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_webhook_test_with_token_when_posted_then_payload_is_echoed() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("bot@example.com", None).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/webhooks/test",
            Some(&token),
            Some(json!({ "ping": 1 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"], json!({ "ping": 1 }));
    assert_eq!(response.body["output"]["status"], json!("received"));
}

#[tokio::test]
async fn given_integrations_disabled_when_calling_n8n_route_then_not_found() {
    let mut settings = test_settings();
    settings.features.integrations = false;
    let app = TestApp::with_settings(settings);

    let response = app
        .request(
            Method::POST,
            "/api/v1/webhooks/conversation-notification",
            None,
            Some(json!({ "type": "created" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
