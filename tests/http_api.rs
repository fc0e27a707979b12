//! End-to-end tests of the HTTP surface against the in-memory store.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use futures_util::StreamExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use users_gateway::api::build_app;
use users_gateway::app_state::AppState;
use users_gateway::auth::{PublicAllowlist, TokenService};
use users_gateway::domain::EventHub;
use users_gateway::persistence::InMemoryUserStore;
use users_gateway::service::PasswordHasher;

const SECRET: &str = "http-api-test-secret-0123456789abcdef";
const PASSWORD: &str = "correct-horse-battery";

fn app() -> Router {
    let Ok(tokens) = TokenService::new(SECRET) else {
        panic!("valid secret");
    };
    let Ok(params) = argon2::Params::new(1024, 1, 1, None) else {
        panic!("valid params");
    };
    let state = AppState::new(
        Arc::new(InMemoryUserStore::new()),
        Arc::new(tokens),
        PasswordHasher::with_params(2, params),
        EventHub::new(64),
        None,
        PublicAllowlist::standard(),
    );
    build_app(state, Duration::from_secs(10))
}

fn request(method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let Ok(request) = builder.body(body) else {
        panic!("valid request");
    };
    request
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router is infallible");
    };
    let status = response.status();
    let headers = response.headers().clone();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body read failed");
    };
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn registration(email: &str) -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": email,
        "password": PASSWORD,
    })
}

/// Registers a user and returns its id.
async fn register(app: &Router, email: &str) -> String {
    let (status, _, body) = send(
        app,
        request(Method::POST, "/users", Some(registration(email)), None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
    let Some(id) = body["id"].as_str() else {
        panic!("registration response has no id");
    };
    id.to_string()
}

/// Logs in and returns the bare token.
async fn login(app: &Router, email: &str) -> String {
    let (status, headers, _) = send(
        app,
        request(
            Method::POST,
            "/auth/login",
            Some(json!({ "email": email, "password": PASSWORD })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    else {
        panic!("login response has no bearer token");
    };
    token.to_string()
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let (status, _, body) = send(&app, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn protected_route_requires_token() {
    let app = app();

    let (status, _, body) = send(&app, request(Method::GET, "/users", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], 1101);

    let (status, _, _) = send(
        &app,
        request(Method::GET, "/users", None, Some("not.a.token")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = app();
    let Ok(tokens) = TokenService::new(SECRET) else {
        panic!("valid secret");
    };
    let issued = chrono::Utc::now() - chrono::Duration::hours(2);
    let Ok(token) = tokens.issue_at("anyone", issued) else {
        panic!("issue failed");
    };
    let (status, _, _) = send(&app, request(Method::GET, "/users", None, Some(token.as_str()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_returns_location_and_projection() {
    let app = app();
    let (status, headers, body) = send(
        &app,
        request(
            Method::POST,
            "/users",
            Some(registration("ada@example.com")),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let Some(id) = body["id"].as_str() else {
        panic!("missing id");
    };
    let location = headers.get(header::LOCATION).and_then(|v| v.to_str().ok());
    assert_eq!(location, Some(format!("/users/{id}").as_str()));
    assert_eq!(body["firstName"], "Ada");
    assert_eq!(body["email"], "ada@example.com");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("albums").is_none());
}

#[tokio::test]
async fn invalid_registration_reports_every_field() {
    let app = app();
    let (status, _, body) = send(
        &app,
        request(
            Method::POST,
            "/users",
            Some(json!({ "firstName": "", "email": "nope", "password": "short" })),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1001);
    let Some(details) = body["error"]["details"].as_array() else {
        panic!("missing details");
    };
    assert_eq!(details.len(), 4);
    let Some(message) = body["error"]["message"].as_str() else {
        panic!("missing message");
    };
    assert!(message.contains("First name cannot be empty"));
    assert!(message.contains("Password must be between 8 and 64 characters"));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app();
    let Ok(req) = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
    else {
        panic!("valid request");
    };
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1002);
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let app = app();
    register(&app, "ada@example.com").await;

    let (status, _, body) = send(
        &app,
        request(
            Method::POST,
            "/users",
            Some(registration("ada@example.com")),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], 2002);
}

#[tokio::test]
async fn login_sets_authorization_and_user_id_headers() {
    let app = app();
    let id = register(&app, "ada@example.com").await;

    let (status, headers, body) = send(
        &app,
        request(
            Method::POST,
            "/auth/login",
            Some(json!({ "email": "ada@example.com", "password": PASSWORD })),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(authorization.starts_with("Bearer "));
    let user_id = headers
        .get("UserId")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(user_id, id);
    assert_eq!(body["userId"], id.as_str());
    assert_eq!(body["expiresIn"], 3600);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = app();
    register(&app, "ada@example.com").await;

    let (status, headers, body) = send(
        &app,
        request(
            Method::POST,
            "/auth/login",
            Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], 1102);
    assert!(headers.get(header::AUTHORIZATION).is_none());
}

#[tokio::test]
async fn users_can_only_read_themselves() {
    let app = app();
    let ada = register(&app, "ada@example.com").await;
    let grace = register(&app, "grace@example.com").await;
    let token = login(&app, "ada@example.com").await;

    let (status, _, body) = send(
        &app,
        request(Method::GET, &format!("/users/{ada}"), None, Some(token.as_str())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], ada.as_str());

    let (status, _, body) = send(
        &app,
        request(Method::GET, &format!("/users/{grace}"), None, Some(token.as_str())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], 1201);
    assert!(body.get("email").is_none());
}

#[tokio::test]
async fn foreign_reads_look_the_same_whether_or_not_the_user_exists() {
    let app = app();
    register(&app, "ada@example.com").await;
    let grace = register(&app, "grace@example.com").await;
    let token = login(&app, "ada@example.com").await;

    let (existing, _, existing_body) = send(
        &app,
        request(Method::GET, &format!("/users/{grace}"), None, Some(token.as_str())),
    )
    .await;
    let missing = uuid::Uuid::new_v4();
    let (absent, _, absent_body) = send(
        &app,
        request(Method::GET, &format!("/users/{missing}"), None, Some(token.as_str())),
    )
    .await;

    assert_eq!(existing, absent);
    assert_eq!(existing, StatusCode::FORBIDDEN);
    assert_eq!(existing_body["error"]["code"], absent_body["error"]["code"]);
}

#[tokio::test]
async fn non_uuid_id_is_rejected() {
    let app = app();
    register(&app, "ada@example.com").await;
    let token = login(&app, "ada@example.com").await;

    let (status, _, _) = send(
        &app,
        request(Method::GET, "/users/not-a-uuid", None, Some(token.as_str())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn include_albums_without_enrichment_omits_albums() {
    let app = app();
    let ada = register(&app, "ada@example.com").await;
    let token = login(&app, "ada@example.com").await;

    let (status, _, body) = send(
        &app,
        request(
            Method::GET,
            &format!("/users/{ada}?include=albums"),
            None,
            Some(token.as_str()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("albums").is_none());
}

#[tokio::test]
async fn list_is_paged() {
    let app = app();
    for n in 0..5 {
        register(&app, &format!("user{n}@example.com")).await;
    }
    let token = login(&app, "user0@example.com").await;

    let page = |uri: &'static str| request(Method::GET, uri, None, Some(token.as_str()));

    let (status, _, body) = send(&app, page("/users?page=0&limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["email"], "user0@example.com");

    let (_, _, body) = send(&app, page("/users?page=2&limit=2")).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["email"], "user4@example.com");

    let (_, _, body) = send(&app, page("/users?offset=2&limit=2")).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (_, _, body) = send(&app, page("/users")).await;
    assert_eq!(body.as_array().map(Vec::len), Some(5));

    let (status, _, body) = send(&app, page("/users?limit=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1002);
}

#[tokio::test]
async fn stream_delivers_registrations() {
    let app = app();
    register(&app, "watcher@example.com").await;
    let token = login(&app, "watcher@example.com").await;

    let Ok(response) = app
        .clone()
        .oneshot(request(Method::GET, "/users/stream", None, Some(token.as_str())))
        .await
    else {
        panic!("router is infallible");
    };
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/event-stream"));

    let mut frames = response.into_body().into_data_stream();
    register(&app, "newcomer@example.com").await;

    let next = tokio::time::timeout(Duration::from_secs(5), frames.next()).await;
    let Ok(Some(Ok(frame))) = next else {
        panic!("no event frame received");
    };
    let text = String::from_utf8_lossy(&frame);
    assert!(text.contains("event: user_created"), "unexpected frame: {text}");
    assert!(text.contains("newcomer@example.com"));
    assert!(!text.contains("watcher@example.com"));
}

#[tokio::test]
async fn stream_requires_token() {
    let app = app();
    let (status, _, _) = send(&app, request(Method::GET, "/users/stream", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
