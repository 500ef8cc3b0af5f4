//! HTTP-level tests against the full router with the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use my_calendar_server::auth::{AuthError, IdentityProvider, IdentityToolkitProvider};
use my_calendar_server::models::AuthUser;
use my_calendar_server::routes::{create_routes, RouteOptions};
use my_calendar_server::services::{EndBeforeStart, EventService, ReadFailurePolicy};
use my_calendar_server::state::AppState;
use my_calendar_server::store::MemoryEventStore;
use my_calendar_server::utils::locale::Locale;

/// Accepts any password except "wrong"; uid is derived from the email.
struct FakeIdentity;

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        if password == "wrong" {
            return Err(AuthError::Rejected("INVALID_PASSWORD".into()));
        }
        Ok(AuthUser {
            uid: format!("uid-{}", email),
            email: email.to_string(),
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.sign_in(email, password).await
    }
}

fn app_with(identity: Arc<dyn IdentityProvider>) -> Router {
    let events = EventService::new(
        Arc::new(MemoryEventStore::new()),
        Locale::En,
        ReadFailurePolicy::Surface,
        EndBeforeStart::Preserve,
    );
    let state = AppState::new(events, identity);
    create_routes(state, &RouteOptions::default())
}

fn app() -> Router {
    app_with(Arc::new(FakeIdentity))
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn sign_in(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/sign-in",
        None,
        Some(json!({"email": email, "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_events_require_session() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_ERROR");

    let (status, _) = send(&app, Method::GET, "/events", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_provider_message_is_surfaced_verbatim() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/sign-in",
        None,
        Some(json!({"email": "a@b.c", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "INVALID_PASSWORD");
}

#[tokio::test]
async fn test_provider_outage_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;
    let identity = IdentityToolkitProvider::new(&server.uri(), "k").unwrap();
    let app = app_with(Arc::new(identity));

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/sign-in",
        None,
        Some(json!({"email": "a@b.c", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "EXTERNAL_SERVICE_ERROR");
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let app = app();
    let token = sign_in(&app, "olena@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/events",
        Some(&token),
        Some(json!({"title": "Standup", "start": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, body) = send(&app, Method::GET, "/events", Some(&token), None).await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn test_standup_end_to_end() {
    let app = app();
    let token = sign_in(&app, "olena@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/events",
        Some(&token),
        Some(json!({"title": "Standup", "start": "2024-03-04T09:00:00", "priority": "normal"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["durationLabel"], "All day");

    let (_, body) = send(&app, Method::GET, "/events", Some(&token), None).await;
    assert_eq!(body["data"]["total"], 1);

    let (status, body) = send(
        &app,
        Method::GET,
        "/events?search=STAND&priority=all",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["events"][0]["id"], id.as_str());

    let (status, _) = send(&app, Method::DELETE, &format!("/events/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/events", Some(&token), None).await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn test_validation_errors_block_writes() {
    let app = app();
    let token = sign_in(&app, "olena@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/events",
        Some(&token),
        Some(json!({"title": "   ", "start": {"date": "2024-03-04", "time": "09:00"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Event title is required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/events",
        Some(&token),
        Some(json!({"title": "Standup"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Start date and time are required");

    let (_, body) = send(&app, Method::GET, "/events", Some(&token), None).await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn test_edit_flow_and_priority_filter() {
    let app = app();
    let token = sign_in(&app, "olena@example.com").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/events",
        Some(&token),
        Some(json!({
            "title": "Sync",
            "description": "quarterly review",
            "start": {"date": "2024-03-04", "time": "11:00"},
            "end": {"date": "2024-03-04", "time": "12:30"}
        })),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, &format!("/events/{}/form", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["start"], "2024-03-04T11:00");
    assert_eq!(body["data"]["endParts"]["time"], "12:30");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/events/{}", id),
        Some(&token),
        Some(json!({
            "title": " Sync ",
            "description": "quarterly review",
            "start": "2024-03-04T11:00",
            "end": "2024-03-04T12:00",
            "priority": "critical"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/events?search=quarterly&priority=critical", Some(&token), None).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["events"][0]["title"], "Sync");
    assert_eq!(body["data"]["events"][0]["durationLabel"], "1 h");

    let (_, body) = send(&app, Method::GET, "/events?priority=normal", Some(&token), None).await;
    assert_eq!(body["data"]["total"], 0);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/events/{}", id),
        Some(&token),
        Some(json!({"end": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, "/events", Some(&token), None).await;
    assert_eq!(body["data"]["events"][0]["durationLabel"], "All day");
    assert!(body["data"]["events"][0]["endTimeLabel"].is_null());

    let (status, body) = send(&app, Method::GET, "/events?priority=urgent", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_users_cannot_see_each_other() {
    let app = app();
    let alice = sign_in(&app, "alice@example.com").await;
    let bob = sign_in(&app, "bob@example.com").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/events",
        Some(&alice),
        Some(json!({"title": "Private", "start": "2024-03-04T09:00"})),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, Method::GET, "/events", Some(&bob), None).await;
    assert_eq!(body["data"]["total"], 0);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/events/{}", id),
        Some(&bob),
        Some(json!({"title": "mine now"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_calendar_feed_and_draft() {
    let app = app();
    let token = sign_in(&app, "olena@example.com").await;

    for (title, start, priority) in [
        ("March", "2024-03-04T09:00", "important"),
        ("April", "2024-04-02T09:00", "normal"),
    ] {
        send(
            &app,
            Method::POST,
            "/events",
            Some(&token),
            Some(json!({"title": title, "start": start, "priority": priority})),
        )
        .await;
    }

    let (status, body) = send(&app, Method::GET, "/calendar?view=month&date=2024-03-15", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["title"], "March");
    assert_eq!(entries[0]["backgroundColor"], "#f59e0b");

    let (_, body) = send(&app, Method::GET, "/calendar/draft?date=2024-03-15", Some(&token), None).await;
    assert_eq!(body["data"]["start"]["date"], "2024-03-15");
    assert_eq!(body["data"]["start"]["time"], "09:00");
    assert_eq!(body["data"]["end"]["time"], "10:00");
}

#[tokio::test]
async fn test_sign_out_ends_session() {
    let app = app();
    let token = sign_in(&app, "olena@example.com").await;

    let (status, body) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["initials"], "O");
    assert!(body["data"].get("token").is_none());

    let (status, _) = send(&app, Method::POST, "/auth/sign-out", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_priorities_table() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/priorities", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["priority"], "normal");
    assert_eq!(rows[0]["label"], "Normal");
}
